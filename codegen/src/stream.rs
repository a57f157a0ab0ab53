//! Indented source accumulation.

use std::fmt;

/// Accumulates generated source, indenting each written line by the
/// current depth.
#[derive(Debug, Default)]
pub struct KernelStream {
    source: String,
    depth: usize,
}

impl KernelStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` as one or more lines, each indented and terminated.
    /// Empty lines stay empty.
    pub fn writeln(&mut self, text: impl AsRef<str>) {
        for line in text.as_ref().split('\n') {
            if !line.is_empty() {
                self.source.push_str(&"  ".repeat(self.depth));
                self.source.push_str(line);
            }
            self.source.push('\n');
        }
    }

    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    pub fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for KernelStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
