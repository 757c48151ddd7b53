//! Lint/fix orchestration (C7/C8 glue), grounded on
//! `original_source/runner.py`'s `LintResult`/`lint_paths`/`format_results`
//! shape. The original only ever emits syntax-error diagnostics -- none of
//! its rules are wired into `lint_paths` -- and never defines `FixResult`
//! or `fix_paths` at all, despite `cli.py` importing both; this module
//! completes the orchestration those names promise, running every enabled
//! rule and the full fix pipeline, with per-file work fanned out across a
//! rayon thread pool the way `fortitude::check::check_files` does.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use similar::TextDiff;

use crate::config::Configuration;
use crate::diagnostic::{Diagnostic, DiagnosticCollection, Severity};
use crate::fix::pipeline::fix_all;
use crate::format::{format_summary, get_formatter};
use crate::parser::parse;
use crate::position::SourceSpan;
use crate::registry::enabled_rules;
use crate::scanner::scan_files;
use crate::suppression::apply_ignores;

/// Code attached to a parse failure, mirroring `constants.SYNTAX_ERROR_CODE`.
pub const SYNTAX_ERROR_CODE: &str = "SYN001";

pub struct LintResult {
    pub diagnostics: DiagnosticCollection,
    pub files_checked: usize,
    pub exit_code: i32,
}

/// Lints already-read `source` attributed to `file`: a syntax error short-circuits
/// to a single [`SYNTAX_ERROR_CODE`] diagnostic, otherwise every enabled rule runs
/// and the suppression engine is applied.
pub fn lint_source(file: &Arc<str>, source: &str, config: &Configuration) -> DiagnosticCollection {
    let mut diagnostics = DiagnosticCollection::new();

    let module = match parse(source) {
        Ok(parsed) => parsed.module,
        Err(err) => {
            diagnostics.add(Diagnostic::new(
                file.clone(),
                SourceSpan::point(err.line, err.column),
                SYNTAX_ERROR_CODE,
                err.message,
                Severity::Error,
                err.source_line,
            ));
            return diagnostics;
        }
    };

    let raw: Vec<Diagnostic> = enabled_rules(config)
        .iter()
        .flat_map(|rule| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| rule.check(&module, source, config)));
            result.unwrap_or_else(|_| {
                log::debug!(
                    "rule {} panicked while checking {}; contributing no diagnostics",
                    rule.code().as_code(),
                    file
                );
                Vec::new()
            })
        })
        .map(|d| Diagnostic {
            file: file.clone(),
            ..d
        })
        .collect();

    diagnostics.add_all(apply_ignores(file, source, Some(&module), raw, &config.ignores));
    diagnostics
}

fn file_arc(path: &Path) -> Arc<str> {
    Arc::from(path.to_string_lossy().as_ref())
}

/// Lints every file discovered under `paths`, in parallel.
pub fn lint_paths(paths: &[PathBuf], config: &Configuration) -> anyhow::Result<LintResult> {
    let files = scan_files(paths, &config.include, &config.exclude)?;

    let per_file: Vec<DiagnosticCollection> = files
        .par_iter()
        .map(|path| {
            let file = file_arc(path);
            match std::fs::read_to_string(path) {
                Ok(source) => lint_source(&file, &source, config),
                Err(err) => {
                    let mut collection = DiagnosticCollection::new();
                    collection.add(Diagnostic::new(
                        file,
                        SourceSpan::point(1, 1),
                        "IOERR",
                        err.to_string(),
                        Severity::Error,
                        None,
                    ));
                    collection
                }
            }
        })
        .collect();

    let mut diagnostics = DiagnosticCollection::new();
    for collection in per_file {
        diagnostics.merge(collection);
    }

    let exit_code = i32::from(diagnostics.has_errors());
    Ok(LintResult {
        diagnostics,
        files_checked: files.len(),
        exit_code,
    })
}

/// Renders a [`LintResult`] the way `format_results` does: formatted
/// diagnostics, then a summary line, then a file count.
pub fn format_results(result: &LintResult, config: &Configuration) -> Result<String, String> {
    let formatter = get_formatter(config.output_format)?;
    let output = formatter.format(&result.diagnostics, config);
    let summary = format_summary(&result.diagnostics);
    let suffix = if result.files_checked != 1 { "s" } else { "" };
    let file_count = format!("Checked {} file{suffix}.", result.files_checked);

    let mut parts = Vec::new();
    if !output.is_empty() {
        parts.push(output);
    }
    parts.push(summary);
    parts.push(file_count);
    Ok(parts.join("\n"))
}

/// Result of running the autofix pipeline over a set of paths: every file
/// whose fixed form differs from its original, keyed by path.
pub struct FixResult {
    pub changes: BTreeMap<PathBuf, (String, String)>,
    pub files_changed: usize,
}

/// Runs [`fix_all`] over every file discovered under `paths`, in parallel,
/// keeping only the files that actually changed.
pub fn fix_paths(paths: &[PathBuf], config: &Configuration) -> anyhow::Result<FixResult> {
    let files = scan_files(paths, &config.include, &config.exclude)?;

    let changed: Vec<(PathBuf, String, String)> = files
        .par_iter()
        .filter_map(|path| {
            let source = std::fs::read_to_string(path).ok()?;
            let fixed = fix_all(&source, config);
            if fixed == source {
                None
            } else {
                Some((path.clone(), source, fixed))
            }
        })
        .collect();

    let files_changed = changed.len();
    let changes = changed
        .into_iter()
        .map(|(path, old, new)| (path, (old, new)))
        .collect();
    Ok(FixResult {
        changes,
        files_changed,
    })
}

/// A unified diff of `old` -> `new`, headed with `path` on both sides.
pub fn format_diff(path: &Path, old: &str, new: &str) -> String {
    let label = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&label, &label)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn lint_source_reports_syntax_error() {
        let file: Arc<str> = Arc::from("bad.py");
        let result = lint_source(&file, "def f(:\n    pass\n", &Configuration::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result.iter().next().unwrap().code, SYNTAX_ERROR_CODE);
    }

    #[test]
    fn lint_source_runs_enabled_rules_and_suppression() {
        let file: Arc<str> = Arc::from("f.py");
        let source = "def greet(name):\n    return name\n";
        let result = lint_source(&file, source, &Configuration::default());
        assert!(result.iter().any(|d| d.code == "TYP001"));
        assert!(result.iter().all(|d| d.file.as_ref() == "f.py"));
    }

    #[test]
    fn lint_paths_walks_directory_and_counts_files() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "a.py", "def f(x: int) -> int:\n    return x\n");
        write_file(tmp.path(), "b.py", "def g(x):\n    return x\n");

        let result = lint_paths(&[tmp.path().to_path_buf()], &Configuration::default()).unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.exit_code, 1);
        assert!(result.diagnostics.iter().any(|d| d.code == "TYP001"));
    }

    #[test]
    fn fix_paths_only_reports_changed_files() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "clean.py", "x: int = 1\n");
        write_file(tmp.path(), "dirty.py", "def f():\n    pass\n");

        let result = fix_paths(&[tmp.path().to_path_buf()], &Configuration::default()).unwrap();
        assert_eq!(result.files_changed, 1);
        assert!(result.changes.keys().next().unwrap().ends_with("dirty.py"));
    }

    #[test]
    fn format_diff_includes_path_header_and_changed_lines() {
        let diff = format_diff(Path::new("f.py"), "def f():\n    pass\n", "def f() -> None:\n    pass\n");
        assert!(diff.contains("f.py"));
        assert!(diff.contains("-def f():"));
        assert!(diff.contains("+def f() -> None:"));
    }
}
