//! Line-oriented output buffer.
//!
//! Separators between pieces are not written eagerly. Each piece records
//! the separator it wants as a pending [`Gap`]; gaps merge by taking the
//! stronger one, and are resolved when the next piece arrives.

/// Separator pending before the next piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Gap {
    None,
    Space,
    /// Line break followed by this many blank lines.
    Lines(usize),
}

#[derive(Debug)]
pub(crate) struct Writer {
    out: String,
    line: String,
    line_open: bool,
    /// The current line holds opaque text and must not be trimmed.
    verbatim: bool,
    unit: String,
    pending: Gap,
    suppress_blank: bool,
    max_blank: usize,
}

impl Writer {
    pub(crate) fn new(unit: String, max_blank: usize) -> Self {
        Self {
            out: String::new(),
            line: String::new(),
            line_open: false,
            verbatim: false,
            unit,
            pending: Gap::None,
            suppress_blank: false,
            max_blank,
        }
    }

    /// Request a separator before the next piece.
    pub(crate) fn gap(&mut self, gap: Gap) {
        self.pending = self.pending.max(gap);
    }

    /// Start the body of a container: next piece on a new line, no blank
    /// lines in between.
    pub(crate) fn open_container(&mut self) {
        self.gap(Gap::Lines(0));
        self.suppress_blank = true;
    }

    /// Close a container: its closer goes on a new line and trailing blank
    /// lines of the body are dropped.
    pub(crate) fn close_container(&mut self) {
        self.pending = Gap::Lines(0);
        self.suppress_blank = false;
    }

    /// Write `s` at indentation `level`.
    pub(crate) fn put(&mut self, level: usize, s: &str) {
        if s.is_empty() {
            return;
        }
        self.resolve(level);
        self.line.push_str(s);
    }

    /// Write opaque text: the first line goes through [`Self::put`], the rest
    /// is copied byte for byte.
    pub(crate) fn opaque(&mut self, level: usize, raw: &str) {
        let mut segments = raw.split('\n');
        if let Some(first) = segments.next() {
            self.resolve(level);
            self.line.push_str(first);
        }
        self.verbatim = true;
        for segment in segments {
            self.raw_line(segment);
        }
    }

    /// Append text to the current line without any separator or
    /// indentation; embedded newlines start raw lines.
    pub(crate) fn append_raw(&mut self, raw: &str) {
        let mut segments = raw.split('\n');
        if let Some(first) = segments.next() {
            self.line.push_str(first);
            self.line_open = true;
        }
        for segment in segments {
            self.verbatim = true;
            self.raw_line(segment);
        }
        if !raw.is_empty() {
            self.verbatim = true;
        }
    }

    fn raw_line(&mut self, segment: &str) {
        self.end_line();
        self.line.push_str(segment);
        self.line_open = true;
        self.verbatim = true;
    }

    fn resolve(&mut self, level: usize) {
        let pending = std::mem::replace(&mut self.pending, Gap::None);
        if self.line_open {
            match pending {
                Gap::None => {}
                Gap::Space => self.line.push(' '),
                Gap::Lines(n) => {
                    self.end_line();
                    self.blank_lines(n);
                    self.indent(level);
                }
            }
        } else {
            if let Gap::Lines(n) = pending {
                self.blank_lines(n);
            }
            self.indent(level);
        }
        self.suppress_blank = false;
    }

    fn blank_lines(&mut self, n: usize) {
        if self.suppress_blank || self.out.is_empty() {
            return;
        }
        for _ in 0..n.min(self.max_blank) {
            self.out.push('\n');
        }
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.line.push_str(&self.unit);
        }
        self.line_open = true;
    }

    fn end_line(&mut self) {
        if !self.line_open {
            return;
        }
        if self.verbatim {
            self.out.push_str(&self.line);
        } else {
            self.out.push_str(self.line.trim_end());
        }
        self.out.push('\n');
        self.line.clear();
        self.line_open = false;
        self.verbatim = false;
    }

    /// Finish the output with exactly one trailing newline.
    pub(crate) fn finish(mut self) -> String {
        self.end_line();
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        if self.out.trim().is_empty() {
            return String::new();
        }
        self.out
    }
}
