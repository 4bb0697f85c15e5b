//! Template scanner.
//!
//! An explicit state machine with a mode stack. Each mode knows which
//! delimiters end it; nested constructs (an echo inside an attribute value
//! inside a tag) push a mode and pop back when they close. Opaque regions
//! (comments, `@verbatim`, `@php`, raw-text elements) jump straight to
//! their literal closing delimiter.

mod balanced;

use crate::attribute;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{LexError, Unterminated};
use crate::registry::{self, Pairing, RawKind};
use crate::span::LineIndex;
use crate::token::{EchoKind, Token, TokenKind};

/// Elements whose body is captured as one raw-text token.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "pre", "textarea"];

/// How a raw region ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawCloser {
    /// `@endphp` or `@endverbatim`
    Directive(&'static str),
    /// `?>`, or end of input.
    PhpTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    DirectiveHead,
    DirectiveArgs {
        start: usize,
    },
    Echo {
        kind: EchoKind,
        start: usize,
    },
    Comment {
        start: usize,
    },
    Tag {
        name_start: usize,
        name_end: usize,
        closing: bool,
        start: usize,
    },
    AttributeValue {
        quote: Option<u8>,
        start: usize,
    },
    Verbatim {
        start: usize,
        closer: &'static str,
    },
    RawCode {
        start: usize,
        closer: RawCloser,
    },
    RawText {
        name_start: usize,
        name_end: usize,
        start: usize,
    },
}

/// Tokens and non-fatal diagnostics produced by a scan.
#[derive(Debug, Default)]
pub(crate) struct Scanned {
    pub(crate) tokens: Vec<Token>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

/// Scan `src` into tokens.
pub(crate) fn scan(src: &str) -> Result<Scanned, LexError> {
    Scanner::new(src).run()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    modes: Vec<Mode>,
    index: LineIndex<'a>,
    out: Scanned,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            modes: vec![Mode::Text],
            index: LineIndex::new(src),
            out: Scanned::default(),
        }
    }

    fn run(mut self) -> Result<Scanned, LexError> {
        while let Some(&mode) = self.modes.last() {
            match mode {
                Mode::Text => {
                    if self.pos >= self.bytes.len() {
                        break;
                    }
                    self.text()?;
                }
                Mode::DirectiveHead => self.directive_head()?,
                Mode::DirectiveArgs { start } => self.directive_args(start)?,
                Mode::Echo { kind, start } => self.echo(kind, start)?,
                Mode::Comment { start } => self.comment(start)?,
                Mode::Tag {
                    name_start,
                    name_end,
                    closing,
                    start,
                } => self.tag(name_start, name_end, closing, start)?,
                Mode::AttributeValue { quote, start } => self.attribute_value(quote, start)?,
                Mode::Verbatim { start, closer } => {
                    self.raw_region(start, RawCloser::Directive(closer), RawKind::Verbatim)?;
                }
                Mode::RawCode { start, closer } => {
                    self.raw_region(start, closer, RawKind::RawCode)?;
                }
                Mode::RawText {
                    name_start,
                    name_end,
                    start,
                } => self.raw_text(name_start, name_end, start)?,
            }
        }
        Ok(self.out)
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.out.tokens.push(Token {
            kind,
            text: self.src[start..end].to_owned(),
            span: self.index.span(start, end),
        });
    }

    fn error(&self, construct: Unterminated, offset: usize) -> LexError {
        let (line, column) = self.index.position(offset);
        LexError {
            construct,
            offset,
            line,
            column,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.at(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Index of the first non-space, non-tab byte at or after `i`.
    fn skip_blanks_from(&self, mut i: usize) -> usize {
        while matches!(self.at(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        i
    }

    fn push(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    fn pop(&mut self) {
        self.modes.pop();
    }

    fn replace(&mut self, mode: Mode) {
        self.pop();
        self.push(mode);
    }

    // Text

    /// Consume text up to the next construct, then enter its mode.
    fn text(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let entered = match self.bytes[self.pos] {
                b'@' => self.at_sign(start),
                b'{' => self.brace(start),
                b'<' => self.angle(start)?,
                _ => {
                    self.pos += 1;
                    false
                }
            };
            if entered {
                return Ok(());
            }
        }
        self.flush_text(start);
        Ok(())
    }

    fn flush_text(&mut self, start: usize) {
        if self.pos > start {
            self.emit(TokenKind::Text, start, self.pos);
        }
    }

    /// Handle `@` in text. Returns true when a directive mode was entered.
    fn at_sign(&mut self, text_start: usize) -> bool {
        let rest = self.rest();
        if rest.starts_with("@@") {
            // `@@if` is literal text.
            self.pos += 2 + ident_len(&rest[2..]);
            return false;
        }
        if let Some(kind) = EchoKind::detect(&rest[1..]) {
            // `@{{ name }}` is literal text.
            let body = self.pos + 1 + kind.open().len();
            self.pos = balanced::find_literal(self.src, body, kind.close())
                .map_or(body, |i| i + kind.close().len());
            return false;
        }
        let preceded_by_word = self.src[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if preceded_by_word || !rest[1..].starts_with(is_ident_start) {
            self.pos += 1;
            return false;
        }
        self.flush_text(text_start);
        self.push(Mode::DirectiveHead);
        true
    }

    /// Handle `{` in text: comments and echoes.
    fn brace(&mut self, text_start: usize) -> bool {
        let rest = self.rest();
        if rest.starts_with("{{--") {
            self.flush_text(text_start);
            self.open_comment();
            return true;
        }
        if let Some(kind) = EchoKind::detect(rest) {
            self.flush_text(text_start);
            self.open_echo(kind);
            return true;
        }
        self.pos += 1;
        false
    }

    fn open_comment(&mut self) {
        let start = self.pos;
        self.emit(TokenKind::CommentOpen, start, start + 4);
        self.pos += 4;
        self.push(Mode::Comment { start });
    }

    fn open_echo(&mut self, kind: EchoKind) {
        let start = self.pos;
        let end = start + kind.open().len();
        self.emit(TokenKind::EchoOpen(kind), start, end);
        self.pos = end;
        self.push(Mode::Echo { kind, start });
    }

    /// Handle `<` in text: tags, HTML comments and PHP tags.
    ///
    /// Returns true when text scanning has to restart after a token.
    fn angle(&mut self, text_start: usize) -> Result<bool, LexError> {
        let rest = self.rest();
        if rest.starts_with("<!--") {
            self.flush_text(text_start);
            let start = self.pos;
            let end = balanced::find_literal(self.src, start + 4, "-->")
                .ok_or_else(|| self.error(Unterminated::HtmlComment, start))?;
            self.emit(TokenKind::HtmlComment, start, end + 3);
            self.pos = end + 3;
            return Ok(true);
        }
        if rest.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("<?php")) {
            self.flush_text(text_start);
            self.push(Mode::RawCode {
                start: self.pos,
                closer: RawCloser::PhpTag,
            });
            return Ok(true);
        }
        let closing = rest.starts_with("</");
        let name_start = self.pos + if closing { 2 } else { 1 };
        if !self.at(name_start).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
            return Ok(false);
        }
        self.flush_text(text_start);
        let start = self.pos;
        let name_end = name_start + self.src[name_start..]
            .find(|c: char| !is_tag_name_char(c))
            .unwrap_or(self.src.len() - name_start);
        self.emit(TokenKind::TagOpen { closing }, start, name_end);
        self.pos = name_end;
        self.push(Mode::Tag {
            name_start,
            name_end,
            closing,
            start,
        });
        Ok(true)
    }

    // Directives

    fn directive_head(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let name_end = start + 1 + ident_len(&self.src[start + 1..]);
        let name = &self.src[start + 1..name_end];
        let descriptor = registry::lookup(name);

        let args_open = match descriptor {
            Some(d) if d.accepts_paren_args => {
                let open = self.skip_blanks_from(name_end);
                (self.at(open) == Some(b'(')).then_some(open)
            }
            Some(_) => None,
            // Unknown directives only take arguments glued to the name, and
            // only when they balance.
            None => (self.at(name_end) == Some(b'(')
                && balanced::find_group_end(self.src, name_end).is_some())
            .then_some(name_end),
        };

        if let Some(Pairing::Raw { closer, kind }) = descriptor.map(|d| d.pairing)
            && args_open.is_none()
        {
            let mode = match kind {
                RawKind::Verbatim => Mode::Verbatim { start, closer },
                RawKind::RawCode => Mode::RawCode {
                    start,
                    closer: RawCloser::Directive(closer),
                },
            };
            self.replace(mode);
            return Ok(());
        }

        self.emit(TokenKind::DirectiveName, start, name_end);
        self.pos = name_end;
        if args_open.is_some() {
            self.replace(Mode::DirectiveArgs { start: name_end });
        } else {
            self.pop();
        }
        Ok(())
    }

    fn directive_args(&mut self, start: usize) -> Result<(), LexError> {
        let open = self.skip_blanks_from(start);
        let end = balanced::find_group_end(self.src, open)
            .ok_or_else(|| self.error(Unterminated::DirectiveArguments, open))?;
        self.emit(TokenKind::DirectiveArgsOpen, start, open + 1);
        self.emit(TokenKind::Expression, open + 1, end - 1);
        self.emit(TokenKind::DirectiveArgsClose, end - 1, end);
        self.pos = end;
        self.pop();
        Ok(())
    }

    // Echoes and comments

    fn echo(&mut self, kind: EchoKind, start: usize) -> Result<(), LexError> {
        let close = balanced::find_closer(self.src, self.pos, kind.close())
            .ok_or_else(|| self.error(Unterminated::Echo, start))?;
        self.emit(TokenKind::Expression, self.pos, close);
        let end = close + kind.close().len();
        self.emit(TokenKind::EchoClose(kind), close, end);
        self.pos = end;
        self.pop();
        Ok(())
    }

    fn comment(&mut self, start: usize) -> Result<(), LexError> {
        let close = balanced::find_literal(self.src, self.pos, "--}}")
            .ok_or_else(|| self.error(Unterminated::Comment, start))?;
        self.emit(TokenKind::CommentBody, self.pos, close);
        self.emit(TokenKind::CommentClose, close, close + 4);
        self.pos = close + 4;
        self.pop();
        Ok(())
    }

    // Tags

    fn tag(
        &mut self,
        name_start: usize,
        name_end: usize,
        closing: bool,
        start: usize,
    ) -> Result<(), LexError> {
        if closing {
            // End tags carry no attributes; anything before `>` is kept as is.
            let close = balanced::find_literal(self.src, self.pos, ">")
                .ok_or_else(|| self.error(Unterminated::Tag, start))?;
            self.emit(TokenKind::TagClose { self_closing: false }, self.pos, close + 1);
            self.pos = close + 1;
            self.pop();
            return Ok(());
        }

        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return Err(self.error(Unterminated::Tag, start));
        }
        if rest.starts_with('>') || rest.starts_with("/>") {
            let self_closing = rest.starts_with('/');
            let end = self.pos + if self_closing { 2 } else { 1 };
            self.emit(TokenKind::TagClose { self_closing }, self.pos, end);
            self.pos = end;
            let name = &self.src[name_start..name_end];
            if !self_closing
                && RAW_TEXT_ELEMENTS
                    .iter()
                    .any(|raw| raw.eq_ignore_ascii_case(name))
            {
                self.replace(Mode::RawText {
                    name_start,
                    name_end,
                    start: self.pos,
                });
            } else {
                self.pop();
            }
            return Ok(());
        }
        if rest.starts_with("{{--") {
            self.open_comment();
            return Ok(());
        }
        if let Some(kind) = EchoKind::detect(rest) {
            self.open_echo(kind);
            return Ok(());
        }
        let src = self.src;
        self.attribute(&src[name_start..name_end]);
        Ok(())
    }

    fn attribute(&mut self, tag_name: &str) {
        let start = self.pos;
        let mut end = start + self.src[start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '(') || c == '/')
            .unwrap_or(self.src.len() - start);
        // A `/` only ends the name when it starts `/>`.
        while self.at(end) == Some(b'/') && self.at(end + 1) != Some(b'>') {
            end += 1;
            end += self.src[end..]
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '(' | '/'))
                .unwrap_or(self.src.len() - end);
        }
        if self.at(end) == Some(b'(') {
            // `@click($event)` or `@class([...])`: the group is part of the name.
            if let Some(group_end) = balanced::find_group_end(self.src, end) {
                end = group_end;
            } else if end == start {
                end += 1;
            }
        }
        if end == start {
            // Stray `=`: keep it as a name so scanning always advances.
            end += 1;
        }

        let after = {
            let mut i = end;
            while self.at(i).is_some_and(|b| b.is_ascii_whitespace()) {
                i += 1;
            }
            i
        };
        let has_value = end > start && self.at(after) == Some(b'=') && self.bytes[start] != b'=';

        let name = &self.src[start..end];
        let classified = attribute::classify(name, tag_name, has_value);
        self.emit(TokenKind::AttributeName(classified.class), start, end);
        if let Some(message) = classified.ambiguity {
            let span = self.index.span(start, end);
            self.out.diagnostics.push(Diagnostic::info(
                span,
                DiagnosticCode::AmbiguousAttribute,
                message,
            ));
        }
        self.pos = end;

        if has_value {
            self.pos = after + 1;
            self.skip_whitespace();
            match self.at(self.pos) {
                Some(q @ (b'"' | b'\'')) => {
                    self.pos += 1;
                    self.push(Mode::AttributeValue {
                        quote: Some(q),
                        start: self.pos - 1,
                    });
                }
                Some(b'>') | None => {
                    self.emit(
                        TokenKind::AttributeValue {
                            quote: None,
                            last: true,
                        },
                        self.pos,
                        self.pos,
                    );
                }
                Some(_) => self.push(Mode::AttributeValue {
                    quote: None,
                    start: self.pos,
                }),
            }
        }
    }

    fn attribute_value(&mut self, quote: Option<u8>, start: usize) -> Result<(), LexError> {
        let piece = self.pos;
        let quote_char = quote.map(char::from);
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let ends = match quote {
                Some(q) => b == q,
                None => {
                    b.is_ascii_whitespace()
                        || b == b'>'
                        || (b == b'/' && self.at(self.pos + 1) == Some(b'>'))
                }
            };
            if ends {
                self.emit(
                    TokenKind::AttributeValue {
                        quote: quote_char,
                        last: true,
                    },
                    piece,
                    self.pos,
                );
                if quote.is_some() {
                    self.pos += 1;
                }
                self.pop();
                return Ok(());
            }
            if b == b'{'
                && let Some(kind) = EchoKind::detect(self.rest())
            {
                if self.pos > piece && self.bytes[self.pos - 1] == b'@' {
                    // `@{{ name }}` stays literal inside values too.
                    let body = self.pos + kind.open().len();
                    self.pos = balanced::find_literal(self.src, body, kind.close())
                        .map_or(body, |i| i + kind.close().len());
                    continue;
                }
                self.emit(
                    TokenKind::AttributeValue {
                        quote: quote_char,
                        last: false,
                    },
                    piece,
                    self.pos,
                );
                self.open_echo(kind);
                return Ok(());
            }
            self.pos += 1;
        }
        match quote {
            Some(_) => Err(self.error(Unterminated::AttributeValue, start)),
            None => {
                self.emit(
                    TokenKind::AttributeValue {
                        quote: None,
                        last: true,
                    },
                    piece,
                    self.pos,
                );
                self.pop();
                Ok(())
            }
        }
    }

    // Opaque regions

    fn raw_region(
        &mut self,
        start: usize,
        closer: RawCloser,
        kind: RawKind,
    ) -> Result<(), LexError> {
        let end = match closer {
            RawCloser::Directive(name) => {
                let needle = format!("@{name}");
                let mut from = start + 1;
                loop {
                    let Some(found) = balanced::find_ignore_case(self.src, from, &needle) else {
                        let construct = match kind {
                            RawKind::Verbatim => Unterminated::Verbatim,
                            RawKind::RawCode => Unterminated::RawCode,
                        };
                        return Err(self.error(construct, start));
                    };
                    let end = found + needle.len();
                    if !self
                        .at(end)
                        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
                    {
                        break end;
                    }
                    from = end;
                }
            }
            RawCloser::PhpTag => balanced::find_literal(self.src, start + 5, "?>")
                .map_or(self.src.len(), |i| i + 2),
        };
        let token = match kind {
            RawKind::Verbatim => TokenKind::VerbatimSpan,
            RawKind::RawCode => TokenKind::RawCodeSpan,
        };
        self.emit(token, start, end);
        self.pos = end;
        self.pop();
        Ok(())
    }

    fn raw_text(
        &mut self,
        name_start: usize,
        name_end: usize,
        start: usize,
    ) -> Result<(), LexError> {
        let needle = format!("</{}", &self.src[name_start..name_end]);
        let mut from = start;
        let close = loop {
            let found = balanced::find_ignore_case(self.src, from, &needle)
                .ok_or_else(|| self.error(Unterminated::RawText, start))?;
            let after = self.at(found + needle.len());
            if after.is_none_or(|b| b.is_ascii_whitespace() || b == b'>' || b == b'/') {
                break found;
            }
            from = found + needle.len();
        };
        self.emit(TokenKind::RawText, start, close);
        self.pos = close;
        self.pop();
        Ok(())
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeClass;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<(TokenKind, String)> {
        scan(src)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_owned())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello world"), vec![tok(TokenKind::Text, "hello world")]);
    }

    #[test]
    fn test_directive_with_args() {
        assert_eq!(
            kinds("@if ($a)x"),
            vec![
                tok(TokenKind::DirectiveName, "@if"),
                tok(TokenKind::DirectiveArgsOpen, " ("),
                tok(TokenKind::Expression, "$a"),
                tok(TokenKind::DirectiveArgsClose, ")"),
                tok(TokenKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn test_directive_args_with_nested_parens_and_strings() {
        let tokens = kinds("@include('a)', ['b' => f(1)])");
        assert_eq!(tokens[2], tok(TokenKind::Expression, "'a)', ['b' => f(1)]"));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_closer_takes_no_args() {
        assert_eq!(
            kinds("@endif (note)"),
            vec![
                tok(TokenKind::DirectiveName, "@endif"),
                tok(TokenKind::Text, " (note)"),
            ]
        );
    }

    #[test]
    fn test_email_is_text() {
        assert_eq!(
            kinds("mail john@example.com"),
            vec![tok(TokenKind::Text, "mail john@example.com")]
        );
    }

    #[test]
    fn test_escaped_directive_is_text() {
        assert_eq!(kinds("@@if($x)"), vec![tok(TokenKind::Text, "@@if($x)")]);
    }

    #[test]
    fn test_escaped_echo_is_text() {
        assert_eq!(
            kinds("@{{ name }} {{ $x }}"),
            vec![
                tok(TokenKind::Text, "@{{ name }} "),
                tok(TokenKind::EchoOpen(EchoKind::Escaped), "{{"),
                tok(TokenKind::Expression, " $x "),
                tok(TokenKind::EchoClose(EchoKind::Escaped), "}}"),
            ]
        );
    }

    #[test]
    fn test_echo_kinds() {
        let tokens = kinds("{!! $html !!}{{{ $old }}}");
        assert_eq!(tokens[0].0, TokenKind::EchoOpen(EchoKind::Raw));
        assert_eq!(tokens[2].0, TokenKind::EchoClose(EchoKind::Raw));
        assert_eq!(tokens[3].0, TokenKind::EchoOpen(EchoKind::LegacyEscaped));
        assert_eq!(tokens[4], tok(TokenKind::Expression, " $old "));
    }

    #[test]
    fn test_echo_with_closer_in_string() {
        let tokens = kinds("{{ '}}' }}");
        assert_eq!(tokens[1], tok(TokenKind::Expression, " '}}' "));
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            kinds("{{-- @if --}}"),
            vec![
                tok(TokenKind::CommentOpen, "{{--"),
                tok(TokenKind::CommentBody, " @if "),
                tok(TokenKind::CommentClose, "--}}"),
            ]
        );
    }

    #[test]
    fn test_verbatim_is_one_span() {
        let src = "@verbatim @if($x) {{ $y }} @endverbatim!";
        assert_eq!(
            kinds(src),
            vec![
                tok(TokenKind::VerbatimSpan, "@verbatim @if($x) {{ $y }} @endverbatim"),
                tok(TokenKind::Text, "!"),
            ]
        );
    }

    #[test]
    fn test_php_block_and_inline() {
        assert_eq!(
            kinds("@php $a = 1; @endphp"),
            vec![tok(TokenKind::RawCodeSpan, "@php $a = 1; @endphp")]
        );
        assert_eq!(kinds("@php($a = 1)")[0], tok(TokenKind::DirectiveName, "@php"));
    }

    #[test]
    fn test_php_tag() {
        assert_eq!(
            kinds("<?php echo 1; ?>x"),
            vec![
                tok(TokenKind::RawCodeSpan, "<?php echo 1; ?>"),
                tok(TokenKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn test_tag_with_foreign_attributes() {
        let tokens = kinds(r#"<button @click="open = !open" :class="{ a: b }" disabled>"#);
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::TagOpen { closing: false }, "<button"),
                tok(
                    TokenKind::AttributeName(AttributeClass::ForeignEventBinding),
                    "@click"
                ),
                tok(
                    TokenKind::AttributeValue {
                        quote: Some('"'),
                        last: true
                    },
                    "open = !open"
                ),
                tok(
                    TokenKind::AttributeName(AttributeClass::ForeignPropertyBinding),
                    ":class"
                ),
                tok(
                    TokenKind::AttributeValue {
                        quote: Some('"'),
                        last: true
                    },
                    "{ a: b }"
                ),
                tok(TokenKind::AttributeName(AttributeClass::Plain), "disabled"),
                tok(TokenKind::TagClose { self_closing: false }, ">"),
            ]
        );
    }

    #[test]
    fn test_attribute_value_with_echo() {
        let tokens = kinds(r#"<a href="/u/{{ $id }}/edit">"#);
        let value = TokenKind::AttributeValue {
            quote: Some('"'),
            last: false,
        };
        assert_eq!(tokens[2], tok(value, "/u/"));
        assert_eq!(tokens[3].0, TokenKind::EchoOpen(EchoKind::Escaped));
        assert_eq!(tokens[4], tok(TokenKind::Expression, " $id "));
        assert_eq!(
            tokens[6],
            tok(
                TokenKind::AttributeValue {
                    quote: Some('"'),
                    last: true
                },
                "/edit"
            )
        );
    }

    #[test]
    fn test_quote_inside_echo_does_not_end_value() {
        let tokens = kinds(r#"<div class="{{ $a ? "x" : "y" }}">"#);
        assert_eq!(tokens[4], tok(TokenKind::Expression, r#" $a ? "x" : "y" "#));
        assert_eq!(tokens.last().unwrap().0, TokenKind::TagClose { self_closing: false });
    }

    #[test]
    fn test_directive_shaped_attribute_is_not_a_directive() {
        let scanned = scan("<input @disabled($locked)>").unwrap();
        assert_eq!(
            scanned.tokens[1].kind,
            TokenKind::AttributeName(AttributeClass::Plain)
        );
        assert_eq!(scanned.tokens[1].text, "@disabled($locked)");
        assert_eq!(
            scanned.diagnostics[0].code,
            DiagnosticCode::AmbiguousAttribute
        );
    }

    #[test]
    fn test_escaped_echo_in_attribute_value() {
        let tokens = kinds(r#"<div title="@{{x}} {{ $y }}">"#);
        assert_eq!(
            tokens[2],
            tok(
                TokenKind::AttributeValue {
                    quote: Some('"'),
                    last: false
                },
                "@{{x}} "
            )
        );
        assert_eq!(tokens[3].0, TokenKind::EchoOpen(EchoKind::Escaped));
    }

    #[test]
    fn test_echo_in_attribute_position() {
        let tokens = kinds("<div {{ $attributes }}>");
        assert_eq!(tokens[1].0, TokenKind::EchoOpen(EchoKind::Escaped));
        assert_eq!(tokens[3].0, TokenKind::EchoClose(EchoKind::Escaped));
    }

    #[test]
    fn test_unquoted_value_and_self_closing() {
        let tokens = kinds("<x-icon size=4/>");
        assert_eq!(
            tokens[2],
            tok(
                TokenKind::AttributeValue {
                    quote: None,
                    last: true
                },
                "4"
            )
        );
        assert_eq!(tokens[3], tok(TokenKind::TagClose { self_closing: true }, "/>"));
    }

    #[test]
    fn test_end_tag() {
        assert_eq!(
            kinds("</div >"),
            vec![
                tok(TokenKind::TagOpen { closing: true }, "</div"),
                tok(TokenKind::TagClose { self_closing: false }, " >"),
            ]
        );
    }

    #[test]
    fn test_script_body_is_raw() {
        let tokens = kinds("<script>if (a < b) { @x }</script>");
        assert_eq!(tokens[2], tok(TokenKind::RawText, "if (a < b) { @x }"));
        assert_eq!(tokens[3], tok(TokenKind::TagOpen { closing: true }, "</script"));
    }

    #[test]
    fn test_less_than_in_text() {
        assert_eq!(kinds("a < b"), vec![tok(TokenKind::Text, "a < b")]);
    }

    #[test]
    fn test_html_comment() {
        assert_eq!(
            kinds("<!-- @if -->"),
            vec![tok(TokenKind::HtmlComment, "<!-- @if -->")]
        );
    }

    #[test]
    fn test_unknown_directive_with_unbalanced_parens() {
        assert_eq!(
            kinds("@foo(bar"),
            vec![
                tok(TokenKind::DirectiveName, "@foo"),
                tok(TokenKind::Text, "(bar"),
            ]
        );
    }

    #[test]
    fn test_inline_condition_after_blanks() {
        let tokens = kinds("@break \t($done)");
        assert_eq!(tokens[0], tok(TokenKind::DirectiveName, "@break"));
        assert_eq!(tokens[1], tok(TokenKind::DirectiveArgsOpen, " \t("));
        assert_eq!(tokens[2], tok(TokenKind::Expression, "$done"));
        assert_eq!(tokens[3], tok(TokenKind::DirectiveArgsClose, ")"));
    }

    #[test]
    fn test_unterminated_constructs() {
        let cases = [
            ("{{ $x", Unterminated::Echo),
            ("{{-- note", Unterminated::Comment),
            ("@if($x", Unterminated::DirectiveArguments),
            ("@verbatim {{ }}", Unterminated::Verbatim),
            ("@php $x = 1;", Unterminated::RawCode),
            ("<div class=\"a", Unterminated::AttributeValue),
            ("<div", Unterminated::Tag),
            ("<!-- x", Unterminated::HtmlComment),
            ("<script>let a;", Unterminated::RawText),
        ];
        for (src, construct) in cases {
            let err = scan(src).unwrap_err();
            assert_eq!(err.construct, construct, "{src}");
        }
    }

    #[test]
    fn test_error_position() {
        let err = scan("ok\n  {{ $x").unwrap_err();
        assert_eq!((err.line, err.column, err.offset), (2, 3, 5));
    }
}
