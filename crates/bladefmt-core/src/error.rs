//! Fatal scanning errors.

/// Construct that was left unterminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unterminated {
    Comment,
    HtmlComment,
    Echo,
    DirectiveArguments,
    Verbatim,
    RawCode,
    Tag,
    AttributeValue,
    RawText,
}

impl std::fmt::Display for Unterminated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Comment => "comment",
            Self::HtmlComment => "HTML comment",
            Self::Echo => "echo",
            Self::DirectiveArguments => "directive arguments",
            Self::Verbatim => "@verbatim block",
            Self::RawCode => "raw PHP block",
            Self::Tag => "tag",
            Self::AttributeValue => "attribute value",
            Self::RawText => "raw text element",
        };
        f.write_str(name)
    }
}

/// The scanner hit the end of input inside a construct.
///
/// This is the only error that aborts formatting of a file; every other
/// problem is recovered and reported as a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unterminated {construct} starting at line {line}, column {column}")]
pub struct LexError {
    pub construct: Unterminated,
    /// Byte offset where the construct starts.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}
