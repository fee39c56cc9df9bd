//! Deep comparer configuration.

/// Configuration for [`LineDiff`](crate::LineDiff) output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Unchanged lines kept around each change. `None` keeps every line.
    pub context_lines: Option<usize>,
    /// Spaces per nesting level in the rendered values.
    pub indent: usize,
}

impl DiffConfig {
    /// Three lines of context, four-space indent.
    pub const fn standard() -> Self {
        Self {
            context_lines: Some(3),
            indent: 4,
        }
    }

    /// Never collapse unchanged lines.
    pub const fn full() -> Self {
        Self {
            context_lines: None,
            indent: 4,
        }
    }

    pub const fn with_context(mut self, lines: usize) -> Self {
        self.context_lines = Some(lines);
        self
    }

    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(DiffConfig::default(), DiffConfig::standard());
        assert_eq!(DiffConfig::default().context_lines, Some(3));
    }

    #[test]
    fn test_builders() {
        let config = DiffConfig::full().with_indent(2);
        assert_eq!(config.context_lines, None);
        assert_eq!(config.indent, 2);

        assert_eq!(DiffConfig::full().with_context(1).context_lines, Some(1));
    }
}
