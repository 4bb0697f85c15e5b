//! Formatter for Blade templates.
//!
//! Blade mixes HTML with `@directives`, `{{ }}` echoes and component tags,
//! and the same markup usually carries Alpine.js or Livewire attributes
//! (`@click`, `:class`, `wire:model`) that look like Blade but are not.
//! This crate reformats such templates without changing what they mean.
//!
//! # Architecture
//!
//! Formatting is a pipeline of single-use stages:
//! - the scanner turns text into tokens, classifying attribute names so
//!   foreign bindings never become directives;
//! - the block matcher pairs directives (`@if`/`@else`/`@endif`) and tags
//!   into a [`Document`] tree, recovering from mismatches with diagnostics;
//! - the printer writes the tree back with canonical indentation and
//!   spacing, leaving opaque regions byte-identical;
//! - the idempotence guard re-reads the output and falls back to the input
//!   if the document would change.
//!
//! # Example
//!
//! ```
//! use bladefmt_core::{FormatOptions, format};
//!
//! let source = "<div>@if($user)<span>{{$user->name}}</span>@endif</div>";
//! let result = format(source, &FormatOptions::default(), None);
//! assert_eq!(
//!     result.formatted_text,
//!     "<div>\n    @if ($user)\n        <span>{{ $user->name }}</span>\n    @endif\n</div>\n"
//! );
//! ```

mod ast;
mod attribute;
mod diagnostic;
mod error;
mod guard;
mod options;
mod parser;
mod printer;
pub mod registry;
mod scanner;
mod span;
mod token;

use std::borrow::Cow;
use std::path::Path;

pub use ast::{
    Attribute, AttributeValue, BlockClose, BlockNode, ComponentNode, DirectiveNode,
    DirectiveRole, Document, EchoNode, ElementNode, EndTag, NamedAttribute, Node, OpaqueKind,
    OpaqueSpan, SlotNode, StartTag, TextNode, ValuePart,
};
pub use attribute::AttributeClass;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::{LexError, Unterminated};
pub use options::{DirectiveClosingStyle, FormatOptions};
pub use span::Span;
pub use token::EchoKind;

/// Output of [`format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// Formatted text, or the input unchanged when it could not be
    /// formatted safely.
    pub formatted_text: String,
    /// Problems found, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl FormatResult {
    /// Whether the formatted text differs from `source`.
    #[must_use]
    pub fn changed(&self, source: &str) -> bool {
        self.formatted_text != source
    }

    /// Whether any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Parse a template into its document tree.
///
/// Structural problems (stray closers, unclosed blocks) are reported in
/// [`Document::diagnostics`]; only unterminated constructs fail.
pub fn parse(source: &str) -> Result<Document, LexError> {
    let scanned = scanner::scan(source)?;
    Ok(parser::parse(scanned.tokens, scanned.diagnostics))
}

/// Format a template.
///
/// Never fails: when the source cannot be formatted safely the result holds
/// the source unchanged and the diagnostics explain why. `file_path` is only
/// used for logging.
pub fn format(source: &str, options: &FormatOptions, file_path: Option<&Path>) -> FormatResult {
    let file = file_path.map_or_else(|| "<input>".to_owned(), |p| p.display().to_string());
    // Only uniform CRLF is normalized; mixed endings keep `\r` as content.
    let crlf = source.contains("\r\n") && !source.replace("\r\n", "").contains('\n');
    let normalized: Cow<'_, str> = if crlf {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    };

    let scanned = match scanner::scan(&normalized) {
        Ok(scanned) => scanned,
        Err(err) => {
            tracing::warn!(file = %file, error = %err, "Leaving file unformatted");
            let span = Span {
                start: err.offset,
                end: err.offset,
                line: err.line,
                column: err.column,
            };
            return FormatResult {
                formatted_text: source.to_owned(),
                diagnostics: vec![Diagnostic::error(
                    span,
                    DiagnosticCode::LexError,
                    err.to_string(),
                )],
            };
        }
    };
    tracing::debug!(file = %file, tokens = scanned.tokens.len(), "Scanned");

    let document = parser::parse(scanned.tokens, scanned.diagnostics);
    tracing::debug!(file = %file, nodes = document.root.len(), "Parsed");

    let candidate = printer::print(&normalized, &document, options);
    tracing::debug!(file = %file, bytes = candidate.len(), "Printed");

    let mut diagnostics = document.diagnostics.clone();
    let formatted = if options.check_idempotence {
        match guard::check(&document, &candidate, options) {
            Ok(()) => Some(candidate),
            Err(violation) => {
                tracing::warn!(file = %file, reason = %violation.message, "Idempotence check failed");
                diagnostics.push(violation);
                None
            }
        }
    } else {
        Some(candidate)
    };

    diagnostics.sort_by_key(|d| (d.line, d.column));
    let formatted_text = match formatted {
        Some(text) if crlf => text.replace('\n', "\r\n"),
        Some(text) => text,
        None => source.to_owned(),
    };
    FormatResult {
        formatted_text,
        diagnostics,
    }
}
