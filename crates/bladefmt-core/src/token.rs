//! Scanner output.

use crate::attribute::AttributeClass;
use crate::span::Span;

/// Interpolation delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoKind {
    /// `{{ expr }}`
    Escaped,
    /// `{!! expr !!}`
    Raw,
    /// `{{{ expr }}}`
    LegacyEscaped,
}

impl EchoKind {
    pub fn open(self) -> &'static str {
        match self {
            Self::Escaped => "{{",
            Self::Raw => "{!!",
            Self::LegacyEscaped => "{{{",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Self::Escaped => "}}",
            Self::Raw => "!!}",
            Self::LegacyEscaped => "}}}",
        }
    }

    /// Detect an echo opener at the start of `rest`.
    ///
    /// Comment openers (`{{--`) are not echoes.
    pub(crate) fn detect(rest: &str) -> Option<Self> {
        if rest.starts_with("{{--") {
            None
        } else if rest.starts_with("{{{") {
            Some(Self::LegacyEscaped)
        } else if rest.starts_with("{{") {
            Some(Self::Escaped)
        } else if rest.starts_with("{!!") {
            Some(Self::Raw)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    /// `@name`, text includes the `@`.
    DirectiveName,
    /// Optional spaces followed by `(`.
    DirectiveArgsOpen,
    /// Opaque body of directive arguments or an echo.
    Expression,
    DirectiveArgsClose,
    EchoOpen(EchoKind),
    EchoClose(EchoKind),
    CommentOpen,
    CommentBody,
    CommentClose,
    /// Whole `<!-- ... -->`.
    HtmlComment,
    /// `<name` or `</name`.
    TagOpen {
        closing: bool,
    },
    /// `>` or `/>`.
    TagClose {
        self_closing: bool,
    },
    AttributeName(AttributeClass),
    /// Literal piece of an attribute value, quotes excluded.
    ///
    /// Echoes inside the value split it into several pieces; the final
    /// piece (possibly empty) has `last` set.
    AttributeValue {
        quote: Option<char>,
        last: bool,
    },
    /// Whole `@verbatim ... @endverbatim`.
    VerbatimSpan,
    /// Whole `@php ... @endphp` or `<?php ... ?>`.
    RawCodeSpan,
    /// Body of `<script>`, `<style>`, `<pre>` or `<textarea>`.
    RawText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
