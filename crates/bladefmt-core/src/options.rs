//! Formatting options.

/// How closing directives are spelled in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DirectiveClosingStyle {
    /// Registry spelling (`@ENDIF` becomes `@endif`).
    #[default]
    Canonical,
    /// Closers keep the spelling found in the source.
    AsWritten,
}

/// Options controlling the formatter output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatOptions {
    /// Spaces per indentation level (ignored with `use_tabs`).
    pub indent_size: usize,
    /// Indent with one tab per level.
    pub use_tabs: bool,
    /// Width above which a start tag is split one attribute per line.
    pub max_line_length: usize,
    /// Sort attributes by kind and name between barrier items.
    pub sort_attributes: bool,
    /// Maximum number of consecutive blank lines kept between siblings.
    pub preserve_blank_lines: usize,
    pub directive_closing_style: DirectiveClosingStyle,
    /// Re-parse the output and fall back to the input when it diverges.
    pub check_idempotence: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            max_line_length: 120,
            sort_attributes: false,
            preserve_blank_lines: 1,
            directive_closing_style: DirectiveClosingStyle::Canonical,
            check_idempotence: true,
        }
    }

    #[must_use]
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    #[must_use]
    pub fn with_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    #[must_use]
    pub fn with_sorted_attributes(mut self, sort: bool) -> Self {
        self.sort_attributes = sort;
        self
    }

    #[must_use]
    pub fn with_preserve_blank_lines(mut self, count: usize) -> Self {
        self.preserve_blank_lines = count;
        self
    }

    #[must_use]
    pub fn with_directive_closing_style(mut self, style: DirectiveClosingStyle) -> Self {
        self.directive_closing_style = style;
        self
    }

    /// Disable the idempotence guard.
    ///
    /// Only useful for debugging the printer: unstable output is returned
    /// as is instead of being replaced by the input.
    #[must_use]
    pub fn with_idempotence_check(mut self, enabled: bool) -> Self {
        self.check_idempotence = enabled;
        self
    }

    /// One level of indentation.
    pub(crate) fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_owned()
        } else {
            " ".repeat(self.indent_size)
        }
    }

    /// Display width of `level` indentation units.
    pub(crate) fn indent_width(&self, level: usize) -> usize {
        level * self.indent_size
    }
}
