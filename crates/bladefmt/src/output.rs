//! Colored terminal output on stderr.

use bladefmt_core::{Diagnostic, Severity};
use console::{Style, Term};

/// Terminal reporter for messages and diagnostics.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan: Style::new().cyan(),
            dim: Style::new().dim(),
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a diagnostic as `file:line:column: severity [code] message`.
    pub(crate) fn diagnostic(&self, file: &str, diagnostic: &Diagnostic) {
        let style = match diagnostic.severity {
            Severity::Error => &self.red,
            Severity::Warning => &self.yellow,
            Severity::Info => &self.cyan,
        };
        let line = format!(
            "{}:{}:{}: {} {} {}",
            file,
            diagnostic.line,
            diagnostic.column,
            style.apply_to(diagnostic.severity),
            self.dim.apply_to(format!("[{}]", diagnostic.code)),
            diagnostic.message
        );
        let _ = self.term.write_line(&line);
    }
}
