//! Suppression engine (C5), grounded on `original_source/ignores.py`:
//! `apply_ignores` filters a diagnostic collection against file-level
//! codes, inline line-ignores, and block ranges, always prepending
//! governance violations, which are themselves never filterable.

use std::collections::HashSet;

use crate::ast::{Module, Stmt};
use crate::config::IgnoreGovernance;
use crate::diagnostic::{Diagnostic, Severity};
use crate::position::SourceSpan;
use crate::registry::RuleCode;

use super::pragma::{parse_ignore_directives, IgnoreDirective};

pub const IGN001_MISSING_REASON: &str = "IGN001";
pub const IGN002_DISALLOWED_CODE: &str = "IGN002";
pub const IGN003_TOO_MANY: &str = "IGN003";

/// A resolved block suppression: `codes` (empty = all) apply to every line
/// in `start..=end`.
struct BlockRange {
    start: u32,
    end: u32,
    codes: Vec<String>,
}

pub fn apply_ignores(
    file: &std::sync::Arc<str>,
    source: &str,
    module: Option<&Module>,
    diagnostics: Vec<Diagnostic>,
    governance: &IgnoreGovernance,
) -> Vec<Diagnostic> {
    let directives = parse_ignore_directives(source);
    let violations = check_governance(file, &directives, governance);

    let file_codes: HashSet<String> = directives
        .iter()
        .filter(|d| d.is_file_level)
        .flat_map(|d| {
            if d.codes.is_empty() {
                vec!["*".to_string()]
            } else {
                d.codes.clone()
            }
        })
        .collect();

    let line_ignores: std::collections::HashMap<u32, Vec<String>> = directives
        .iter()
        .filter(|d| d.is_inline && !d.is_file_level)
        .map(|d| (d.line, d.codes.clone()))
        .collect();

    let block_ranges = module.map(|m| resolve_block_ranges(m, &directives)).unwrap_or_default();

    let mut kept: Vec<Diagnostic> = diagnostics
        .into_iter()
        .filter(|d| !is_suppressed(d, &file_codes, &line_ignores, &block_ranges, governance))
        .collect();

    let mut result = violations;
    result.append(&mut kept);
    result
}

fn is_suppressed(
    diagnostic: &Diagnostic,
    file_codes: &HashSet<String>,
    line_ignores: &std::collections::HashMap<u32, Vec<String>>,
    block_ranges: &[BlockRange],
    governance: &IgnoreGovernance,
) -> bool {
    if let Some(rule_code) = RuleCode::from_code(diagnostic.code) {
        if governance.disallow.contains(&rule_code) {
            return false;
        }
    }
    if file_codes.contains("*") || file_codes.contains(diagnostic.code) {
        return true;
    }
    let line = diagnostic.location.line();
    if let Some(codes) = line_ignores.get(&line) {
        if codes.is_empty() || codes.iter().any(|c| c == diagnostic.code) {
            return true;
        }
    }
    for range in block_ranges {
        if line >= range.start && line <= range.end {
            if range.codes.is_empty() || range.codes.iter().any(|c| c == diagnostic.code) {
                return true;
            }
        }
    }
    false
}

/// Resolves each block-style directive (one alone on its own line) against
/// the statement that follows it, mirroring
/// `_resolve_block_ranges`/`_collect_statement_ranges`: the directive
/// applies from the line after it through the end line of the next
/// statement whose effective start line is >= the directive's line.
fn resolve_block_ranges(module: &Module, directives: &[IgnoreDirective]) -> Vec<BlockRange> {
    let block_directives: Vec<&IgnoreDirective> = directives
        .iter()
        .filter(|d| !d.is_inline && !d.is_file_level)
        .collect();
    if block_directives.is_empty() {
        return Vec::new();
    }

    let mut statement_ranges: Vec<(u32, u32)> = module
        .walk_statements()
        .map(|s| (s.effective_start_line(), s.end_line()))
        .collect();
    statement_ranges.sort_by_key(|(start, _)| *start);

    block_directives
        .into_iter()
        .filter_map(|directive| {
            let next = statement_ranges
                .iter()
                .find(|(start, _)| *start > directive.line)?;
            Some(BlockRange {
                start: next.0,
                end: next.1,
                codes: directive.codes.clone(),
            })
        })
        .collect()
}

fn check_governance(
    file: &std::sync::Arc<str>,
    directives: &[IgnoreDirective],
    governance: &IgnoreGovernance,
) -> Vec<Diagnostic> {
    let mut violations = Vec::new();

    if governance.require_reason {
        for directive in directives {
            if directive.reason.is_none() {
                violations.push(Diagnostic::new(
                    file.clone(),
                    SourceSpan::point(directive.line, 1),
                    IGN001_MISSING_REASON,
                    "ignore directive is missing a `because:` reason",
                    Severity::Error,
                    None,
                ));
            }
        }
    }

    for directive in directives {
        for code in &directive.codes {
            if let Some(rule_code) = RuleCode::from_code(code) {
                if governance.disallow.contains(&rule_code) {
                    violations.push(Diagnostic::new(
                        file.clone(),
                        SourceSpan::point(directive.line, 1),
                        IGN002_DISALLOWED_CODE,
                        format!("code {code} may not be suppressed"),
                        Severity::Error,
                        None,
                    ));
                }
            }
        }
    }

    if let Some(max) = governance.max_per_file {
        if directives.len() > max {
            violations.push(Diagnostic::new(
                file.clone(),
                SourceSpan::point(1, 1),
                IGN003_TOO_MANY,
                format!(
                    "{} ignore directives exceed the configured maximum of {max}",
                    directives.len()
                ),
                Severity::Error,
                None,
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn diag(code: &'static str, line: u32) -> Diagnostic {
        Diagnostic::new(
            Arc::from("f.py"),
            SourceSpan::point(line, 1),
            code,
            "msg",
            Severity::Error,
            None,
        )
    }

    #[test]
    fn inline_ignore_suppresses_only_its_line() {
        let source = "x: int = 1  # pyguard: ignore[TYP001] because: ok\ny: int = 2\n";
        let diagnostics = vec![diag("TYP001", 1), diag("TYP001", 2)];
        let out = apply_ignores(
            &Arc::from("f.py"),
            source,
            None,
            diagnostics,
            &IgnoreGovernance::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].location.line(), 2);
    }

    #[test]
    fn missing_reason_is_ign001() {
        let source = "x: int = 1  # pyguard: ignore[TYP001]\n";
        let out = apply_ignores(
            &Arc::from("f.py"),
            source,
            None,
            vec![diag("TYP001", 1)],
            &IgnoreGovernance::default(),
        );
        assert!(out.iter().any(|d| d.code == IGN001_MISSING_REASON));
    }

    #[test]
    fn ign001_is_never_filtered_by_file_level_ignore() {
        let source = "# pyguard: ignore-file[IGN001] because: nope\nx: int = 1  # pyguard: ignore[TYP001]\n";
        let out = apply_ignores(
            &Arc::from("f.py"),
            source,
            None,
            vec![diag("TYP001", 2)],
            &IgnoreGovernance::default(),
        );
        assert!(out.iter().any(|d| d.code == IGN001_MISSING_REASON));
    }

    #[test]
    fn disallowed_code_is_kept_despite_file_level_ignore() {
        let source = "# pyguard: ignore-file[TYP001] because: x\nx: int = 1\n";
        let governance = IgnoreGovernance {
            disallow: [RuleCode::Typ001].into_iter().collect(),
            ..IgnoreGovernance::default()
        };
        let out = apply_ignores(&Arc::from("f.py"), source, None, vec![diag("TYP001", 2)], &governance);
        assert!(out.iter().any(|d| d.code == IGN002_DISALLOWED_CODE));
        assert!(out.iter().any(|d| d.code == "TYP001"));
    }

    #[test]
    fn disallowed_code_is_kept_despite_inline_ignore() {
        let source = "x: int = 1  # pyguard: ignore[TYP001] because: x\n";
        let governance = IgnoreGovernance {
            disallow: [RuleCode::Typ001].into_iter().collect(),
            ..IgnoreGovernance::default()
        };
        let out = apply_ignores(&Arc::from("f.py"), source, None, vec![diag("TYP001", 1)], &governance);
        assert!(out.iter().any(|d| d.code == "TYP001"));
    }
}
