//! Diagnostic data model (C2). Grounded on `fortitude_linter`'s
//! `DiagnosticMessage`/`Emitter` split and on `original_source/diagnostics.py`.

use std::sync::Arc;

use crate::position::SourceSpan;

/// Diagnostic-level severity. Unlike [`crate::config::Severity`], `Off`
/// structurally cannot occur here: a rule at `Off` never runs, so it can
/// never produce a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic (error, warning) found in a file.
///
/// Two diagnostics are equal iff every field is equal; [`DiagnosticCollection`]
/// never deduplicates, matching spec.md §3's invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Arc<str>,
    pub location: SourceSpan,
    pub code: &'static str,
    pub message: String,
    pub severity: Severity,
    pub source_line: Option<String>,
}

impl Diagnostic {
    pub fn new(
        file: Arc<str>,
        location: SourceSpan,
        code: &'static str,
        message: impl Into<String>,
        severity: Severity,
        source_line: Option<String>,
    ) -> Self {
        Self {
            file,
            location,
            code,
            message: message.into(),
            severity,
            source_line,
        }
    }

    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.location.line(), self.location.column())
    }
}

/// Mutable collection of diagnostics with sorting and counting, grounded on
/// `original_source/diagnostics.py::DiagnosticCollection`.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn add_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn merge(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sorted by `(file, line, column)`; stable under insertion order for ties.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut refs: Vec<&Diagnostic> = self.diagnostics.iter().collect();
        refs.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        refs
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warn)
            .count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticCollection {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(file: &str, line: u32, column: u32) -> Diagnostic {
        Diagnostic::new(
            Arc::from(file),
            SourceSpan::point(line, column),
            "TYP001",
            "missing annotation",
            Severity::Error,
            None,
        )
    }

    #[test]
    fn sorted_by_file_then_line_then_column() {
        let mut collection = DiagnosticCollection::new();
        collection.add(diag("b.py", 1, 1));
        collection.add(diag("a.py", 2, 1));
        collection.add(diag("a.py", 1, 5));
        collection.add(diag("a.py", 1, 1));

        let files: Vec<_> = collection
            .sorted()
            .into_iter()
            .map(|d| (d.file.as_ref(), d.location.line(), d.location.column()))
            .collect();
        assert_eq!(
            files,
            vec![
                ("a.py", 1, 1),
                ("a.py", 1, 5),
                ("a.py", 2, 1),
                ("b.py", 1, 1),
            ]
        );
    }

    #[test]
    fn counts_by_severity() {
        let mut collection = DiagnosticCollection::new();
        collection.add(diag("a.py", 1, 1));
        collection.add(Diagnostic::new(
            Arc::from("a.py"),
            SourceSpan::point(2, 1),
            "TYP003",
            "missing annotation",
            Severity::Warn,
            None,
        ));
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.warning_count(), 1);
        assert!(collection.has_errors());
    }
}
