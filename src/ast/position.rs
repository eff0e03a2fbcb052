//! Source positions for diagnostics
//!
//! Positions are stored zero-based and displayed one-based, the way editors
//! and compiler diagnostics number lines and columns. Columns count bytes.

use serde::Serialize;
use std::fmt;

/// Line and column in source text, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of byte `offset` in `source`, clamped to the end of input
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        Self::new(line, before.len() - line_start)
    }

    /// One-based line number for diagnostics
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// One-based column number for diagnostics
    pub fn display_column(&self) -> usize {
        self.column + 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.display_line(), self.display_column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_offset_multiline() {
        let source = "technique {\n  pass {\n  }\n}";

        assert_eq!(Position::at_offset(source, 0), Position::new(0, 0));
        assert_eq!(Position::at_offset(source, 10), Position::new(0, 10));
        assert_eq!(Position::at_offset(source, 12), Position::new(1, 0));
        assert_eq!(Position::at_offset(source, 14), Position::new(1, 2));
        assert_eq!(Position::at_offset(source, 21), Position::new(2, 0));
    }

    #[test]
    fn test_end_of_input() {
        assert_eq!(Position::at_offset("a\nbc", 4), Position::new(1, 2));
        assert_eq!(Position::at_offset("a\n", 2), Position::new(1, 0));
        assert_eq!(Position::at_offset("", 0), Position::new(0, 0));
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(2, 7).to_string(), "3:8");
    }
}
