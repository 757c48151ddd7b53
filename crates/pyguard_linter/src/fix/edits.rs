//! Shared plumbing for line/column text edits. Grounded on
//! `original_source/fixers/_util.py::apply_insertions`: edits are computed
//! against token/AST positions, then spliced in right-to-left so earlier
//! offsets on the same line stay valid, and the result is discarded if it
//! no longer parses.

use crate::parser::parse;

#[derive(Debug, Clone)]
pub struct Edit {
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
    pub replacement: String,
}

impl Edit {
    /// A pure insertion at `(line, col)` -- `start_col == end_col`.
    pub fn insert(line: u32, col: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            start_col: col,
            end_col: col,
            replacement: text.into(),
        }
    }

    /// Replace the half-open `[start_col, end_col)` range on `line`.
    pub fn replace(line: u32, start_col: u32, end_col: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            start_col,
            end_col,
            replacement: text.into(),
        }
    }
}

/// Apply `edits` to `source`. Multiple edits on the same line are applied
/// right-to-left so earlier column offsets remain valid; out-of-range
/// edits are silently dropped (the node they were computed from must have
/// moved under a prior edit, so skipping it is safer than corrupting the
/// line).
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    if edits.is_empty() {
        return source.to_string();
    }
    edits.sort_by(|a, b| b.line.cmp(&a.line).then(b.start_col.cmp(&a.start_col)));

    let mut lines = split_keepends(source);
    for edit in edits {
        let Some(idx) = (edit.line as usize).checked_sub(1) else { continue };
        let Some(line_chars) = lines.get_mut(idx) else { continue };
        let Some(start) = (edit.start_col as usize).checked_sub(1) else { continue };
        let Some(end) = (edit.end_col as usize).checked_sub(1) else { continue };
        if start > line_chars.len() || end > line_chars.len() || start > end {
            continue;
        }
        let replacement: Vec<char> = edit.replacement.chars().collect();
        line_chars.splice(start..end, replacement);
    }
    lines.into_iter().flatten().collect()
}

/// Apply `edits`, then re-parse the result and fall back to the original
/// source if it no longer parses -- a defence against malformed rewrites,
/// mirroring `apply_insertions`.
pub fn apply_edits_checked(source: &str, edits: Vec<Edit>) -> String {
    if edits.is_empty() {
        return source.to_string();
    }
    let result = apply_edits(source, edits);
    if parse(&result).is_err() {
        return source.to_string();
    }
    result
}

fn split_keepends(source: &str) -> Vec<Vec<char>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for c in source.chars() {
        current.push(c);
        if c == '\n' {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_without_disturbing_other_lines() {
        let source = "def f():\n    pass\n";
        let result = apply_edits(source, vec![Edit::insert(1, 8, " -> None")]);
        assert_eq!(result, "def f() -> None:\n    pass\n");
    }

    #[test]
    fn multiple_edits_same_line_apply_right_to_left() {
        let source = "x = 1\n";
        let edits = vec![Edit::insert(1, 2, ": int"), Edit::replace(1, 5, 6, "2")];
        let result = apply_edits(source, edits);
        assert_eq!(result, "x: int = 2\n");
    }

    #[test]
    fn falls_back_to_original_on_invalid_result() {
        let source = "def f():\n    pass\n";
        let edits = vec![Edit::insert(1, 1, "$$$")];
        let result = apply_edits_checked(source, edits);
        assert_eq!(result, source);
    }
}
