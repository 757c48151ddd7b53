//! JSON formatter, grounded on
//! `original_source/formatters.py::JsonFormatter`.

use serde::Serialize;

use super::Formatter;
use crate::config::Configuration;
use crate::diagnostic::{Diagnostic, DiagnosticCollection};

#[derive(Serialize)]
struct DiagnosticJson<'a> {
    file: &'a str,
    line: u32,
    column: u32,
    end_line: Option<u32>,
    end_column: Option<u32>,
    code: &'static str,
    severity: crate::diagnostic::Severity,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_line: Option<&'a str>,
}

impl<'a> DiagnosticJson<'a> {
    fn from_diagnostic(diag: &'a Diagnostic, show_source: bool) -> Self {
        Self {
            file: &diag.file,
            line: diag.location.line(),
            column: diag.location.column(),
            end_line: diag.location.end.map(|e| e.line),
            end_column: diag.location.end.map(|e| e.column),
            code: diag.code,
            severity: diag.severity,
            message: &diag.message,
            source_line: show_source.then_some(diag.source_line.as_deref()).flatten(),
        }
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, diagnostics: &DiagnosticCollection, config: &Configuration) -> String {
        let items: Vec<DiagnosticJson> = diagnostics
            .sorted()
            .into_iter()
            .map(|d| DiagnosticJson::from_diagnostic(d, config.show_source))
            .collect();
        serde_json::to_string_pretty(&items).expect("diagnostic JSON is always serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::position::SourceSpan;
    use std::sync::Arc;

    #[test]
    fn serializes_sorted_diagnostics_with_source_line() {
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.add(Diagnostic::new(
            Arc::from("f.py"),
            SourceSpan::point(1, 1),
            "TYP001",
            "msg",
            Severity::Error,
            Some("x".to_string()),
        ));
        let output = JsonFormatter.format(&diagnostics, &Configuration::default());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["code"], "TYP001");
        assert_eq!(parsed[0]["source_line"], "x");
    }

    #[test]
    fn omits_source_line_when_disabled() {
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.add(Diagnostic::new(
            Arc::from("f.py"),
            SourceSpan::point(1, 1),
            "TYP001",
            "msg",
            Severity::Error,
            Some("x".to_string()),
        ));
        let mut config = Configuration::default();
        config.show_source = false;
        let output = JsonFormatter.format(&diagnostics, &config);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed[0].get("source_line").is_none());
    }
}
