//! Source positions. All values are 1-based, matching spec.md's data model.

use std::fmt;

/// A single `(line, column)` location. Columns are code-point offsets
/// within a line, never byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A location plus an optional end position, used by diagnostics and AST
/// node spans alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: Option<SourcePosition>,
}

impl SourceSpan {
    pub const fn point(line: u32, column: u32) -> Self {
        Self {
            start: SourcePosition::new(line, column),
            end: None,
        }
    }

    pub const fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub const fn line(&self) -> u32 {
        self.start.line
    }

    pub const fn column(&self) -> u32 {
        self.start.column
    }
}
