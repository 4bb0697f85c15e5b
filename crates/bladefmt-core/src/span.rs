//! Source positions.

/// A region of the source text.
///
/// `start` and `end` are byte offsets. `line` and `column` are 1-based and
/// describe `start`; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Byte length of the spanned region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Maps byte offsets to line and column numbers.
#[derive(Debug)]
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column (both 1-based) of a byte offset.
    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count());
        (line + 1, column + 1)
    }

    pub(crate) fn span(&self, start: usize, end: usize) -> Span {
        let (line, column) = self.position(start);
        Span {
            start,
            end,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_first_line() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(2), (1, 3));
    }

    #[test]
    fn test_position_after_newline() {
        let index = LineIndex::new("abc\ndef\n");
        assert_eq!(index.position(4), (2, 1));
        assert_eq!(index.position(6), (2, 3));
        assert_eq!(index.position(8), (3, 1));
    }

    #[test]
    fn test_column_counts_chars() {
        let index = LineIndex::new("é@if");
        assert_eq!(index.position(2), (1, 2));
    }

    #[test]
    fn test_span_len() {
        let index = LineIndex::new("hello world");
        let span = index.span(6, 11);
        assert_eq!(span.len(), 5);
        assert_eq!(span.column, 7);
        assert!(!span.is_empty());
    }
}
