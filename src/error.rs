//! Compilation errors
//!
//! Every failure aborts the whole document; no partial tree is returned.
//! `Syntax` and `ResourceResolution` are problems in the document or its
//! assets. `ScopeImbalance`, `StackUnderflow` and `UnconsumedValues` mean the
//! grammar and the semantic actions disagree and point at a compiler bug.

use std::fmt;
use thiserror::Error;

use crate::ast::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    ScopeImbalance,
    StackUnderflow,
    UnconsumedValues,
    ResourceResolution,
    Io,
}

impl ErrorKind {
    /// Whether the error reflects a defect in the compiler rather than its input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorKind::ScopeImbalance | ErrorKind::StackUnderflow | ErrorKind::UnconsumedValues
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::ScopeImbalance => "scope imbalance",
            ErrorKind::StackUnderflow => "value stack underflow",
            ErrorKind::UnconsumedValues => "unconsumed values",
            ErrorKind::ResourceResolution => "resource error",
            ErrorKind::Io => "i/o error",
        };
        f.write_str(text)
    }
}

/// A located compilation failure
///
/// `line` and `column` are one-based; zero means the error has no location.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{file}:{line}:{column}: {kind}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            line: 0,
            column: 0,
            message: message.into(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.line = position.display_line();
        self.column = position.display_column();
        self
    }

    /// Locate the error at byte `offset` of `source`
    pub fn at_offset(self, source: &str, offset: usize) -> Self {
        self.at(Position::at_offset(source, offset))
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CompileError::new(ErrorKind::Syntax, "wood.mat", "unknown cull face `Sideways`")
            .at_offset("technique {\n  CullFace Sideways\n}", 23);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 12);
        assert_eq!(
            err.to_string(),
            "wood.mat:2:12: syntax error: unknown cull face `Sideways`"
        );
    }

    #[test]
    fn test_internal_kinds() {
        assert!(ErrorKind::StackUnderflow.is_internal());
        assert!(ErrorKind::ScopeImbalance.is_internal());
        assert!(!ErrorKind::Syntax.is_internal());
        assert!(!ErrorKind::ResourceResolution.is_internal());
    }
}
