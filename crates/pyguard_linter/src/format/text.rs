//! Human-readable text formatter, grounded on
//! `original_source/formatters.py::TextFormatter`.

use colored::{control, Colorize};

use super::Formatter;
use crate::config::{ColorMode, Configuration};
use crate::diagnostic::{DiagnosticCollection, Severity};

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, diagnostics: &DiagnosticCollection, config: &Configuration) -> String {
        match config.color {
            ColorMode::Always => control::set_override(true),
            ColorMode::Never => control::set_override(false),
            ColorMode::Auto => control::unset_override(),
        }

        let mut lines = Vec::new();
        for diag in diagnostics.sorted() {
            let severity = match diag.severity {
                Severity::Error => "ERROR".red().bold().to_string(),
                Severity::Warn => "WARN".yellow().bold().to_string(),
            };
            lines.push(format!(
                "{}:{}:{}: {severity} [{}] {}",
                diag.file,
                diag.location.line(),
                diag.location.column(),
                diag.code,
                diag.message
            ));

            if config.show_source {
                if let Some(source_line) = &diag.source_line {
                    lines.push(format!("    {source_line}"));
                    let caret_pos = diag.location.column().saturating_sub(1) as usize;
                    lines.push(format!("    {}^", " ".repeat(caret_pos)));
                    lines.push(String::new());
                }
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, Severity};
    use crate::position::SourceSpan;
    use std::sync::Arc;

    #[test]
    fn formats_one_line_per_diagnostic_with_caret() {
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.add(Diagnostic::new(
            Arc::from("f.py"),
            SourceSpan::point(3, 5),
            "TYP001",
            "Parameter 'x' is missing a type annotation",
            Severity::Error,
            Some("def f(x):".to_string()),
        ));
        let output = TextFormatter.format(&diagnostics, &Configuration::default());
        let expected = "f.py:3:5: ERROR [TYP001] Parameter 'x' is missing a type annotation\n    def f(x):\n    ^\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn omits_source_snippet_when_disabled() {
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
        let output = TextFormatter.format(&diagnostics, &config);
        assert_eq!(output, "f.py:1:1: ERROR [TYP001] msg");
    }
}
