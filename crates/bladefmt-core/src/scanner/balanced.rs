//! Bracket and quote aware searching.
//!
//! All delimiters are ASCII, so scanning works on bytes: UTF-8 continuation
//! bytes never collide with them.

/// Skip a quoted string whose opening quote is at `open`.
///
/// Returns the index just past the closing quote. Backslash escapes the
/// next byte.
pub(crate) fn skip_quoted(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Find the end of a bracket group opening at `open`.
///
/// Nested `()`, `[]` and `{}` are balanced and quoted strings are skipped.
/// Returns the index just past the matching closer.
pub(crate) fn find_group_end(src: &str, open: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i)?;
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Find where `closer` starts, searching from `from`.
///
/// Quoted strings are skipped first; if that fails to find a closer (for
/// example because of a stray apostrophe in prose) the first literal
/// occurrence is used instead.
pub(crate) fn find_closer(src: &str, from: usize, closer: &str) -> Option<usize> {
    find_closer_quoted(src, from, closer).or_else(|| find_literal(src, from, closer))
}

fn find_closer_quoted(src: &str, from: usize, closer: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let needle = closer.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i..].starts_with(needle) {
            return Some(i);
        }
        match bytes[i] {
            b'\'' | b'"' => i = skip_quoted(bytes, i)?,
            _ => i += 1,
        }
    }
    None
}

/// First occurrence of `needle` at or after `from`.
pub(crate) fn find_literal(src: &str, from: usize, needle: &str) -> Option<usize> {
    src.get(from..)?.find(needle).map(|i| from + i)
}

/// First occurrence of `needle` at or after `from`, ignoring ASCII case.
pub(crate) fn find_ignore_case(src: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(from);
    }
    (from..bytes.len().saturating_sub(needle.len() - 1))
        .find(|&i| bytes[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
