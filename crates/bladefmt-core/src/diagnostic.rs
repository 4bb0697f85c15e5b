//! Diagnostics reported alongside formatted output.

use crate::span::Span;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Machine-readable diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagnosticCode {
    LexError,
    UnmatchedDirective,
    UnknownDirective,
    AmbiguousAttribute,
    IdempotenceViolation,
    UnmatchedTag,
    UnclosedTag,
}

impl DiagnosticCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LexError => "lex-error",
            Self::UnmatchedDirective => "unmatched-directive",
            Self::UnknownDirective => "unknown-directive",
            Self::AmbiguousAttribute => "ambiguous-attribute",
            Self::IdempotenceViolation => "idempotence-violation",
            Self::UnmatchedTag => "unmatched-tag",
            Self::UnclosedTag => "unclosed-tag",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found while formatting, anchored to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: String,
    pub code: DiagnosticCode,
}

impl Diagnostic {
    pub(crate) fn new(
        span: Span,
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line: span.line,
            column: span.column,
            severity,
            message: message.into(),
            code,
        }
    }

    pub(crate) fn error(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(span, Severity::Error, code, message)
    }

    pub(crate) fn warning(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(span, Severity::Warning, code, message)
    }

    pub(crate) fn info(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(span, Severity::Info, code, message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, self.severity, self.code, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        let span = Span {
            start: 0,
            end: 3,
            line: 4,
            column: 2,
        };
        let diag = Diagnostic::warning(span, DiagnosticCode::UnmatchedDirective, "stray @endif");
        assert_eq!(
            diag.to_string(),
            "4:2: warning [unmatched-directive] stray @endif"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
