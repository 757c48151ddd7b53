//! Output formatters (C6). Grounded on `original_source/formatters.py`.

pub mod json;
pub mod text;

use crate::config::{Configuration, OutputFormat};
use crate::diagnostic::DiagnosticCollection;

/// A diagnostic output format.
pub trait Formatter {
    fn format(&self, diagnostics: &DiagnosticCollection, config: &Configuration) -> String;
}

/// Resolves the configured format to a [`Formatter`].
///
/// `OutputFormat::Github` is carried in [`crate::config::OutputFormat`] for
/// parity with the original, which defines the enum variant but never
/// implements its formatter either; selecting it is a configuration error
/// the caller should surface rather than silently falling back to text.
pub fn get_formatter(output_format: OutputFormat) -> Result<Box<dyn Formatter>, String> {
    match output_format {
        OutputFormat::Json => Ok(Box::new(json::JsonFormatter)),
        OutputFormat::Github => Err("GitHub annotation format is not yet implemented".to_string()),
        OutputFormat::Text => Ok(Box::new(text::TextFormatter)),
    }
}

/// `"N error(s), M warning(s)."`, or `"No issues found."` when the
/// collection is empty of both.
pub fn format_summary(diagnostics: &DiagnosticCollection) -> String {
    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();

    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(format!("{errors} error{}", if errors != 1 { "s" } else { "" }));
    }
    if warnings > 0 {
        parts.push(format!("{warnings} warning{}", if warnings != 1 { "s" } else { "" }));
    }

    if parts.is_empty() {
        "No issues found.".to_string()
    } else {
        format!("Found {}.", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, Severity};
    use crate::position::SourceSpan;
    use std::sync::Arc;

    #[test]
    fn summary_reports_no_issues_when_empty() {
        assert_eq!(format_summary(&DiagnosticCollection::new()), "No issues found.");
    }

    #[test]
    fn summary_pluralizes_counts() {
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.add(Diagnostic::new(Arc::from("f.py"), SourceSpan::point(1, 1), "TYP001", "m", Severity::Error, None));
        diagnostics.add(Diagnostic::new(Arc::from("f.py"), SourceSpan::point(2, 1), "TYP001", "m", Severity::Error, None));
        diagnostics.add(Diagnostic::new(Arc::from("f.py"), SourceSpan::point(3, 1), "KW001", "m", Severity::Warn, None));
        assert_eq!(format_summary(&diagnostics), "Found 2 errors, 1 warning.");
    }

    #[test]
    fn github_format_is_not_yet_implemented() {
        assert!(get_formatter(OutputFormat::Github).is_err());
    }
}
