//! Chains the str-to-str fixers in dependency order. Grounded on
//! `original_source/fixers/pipeline.py`.
//!
//! KW001 is deliberately left out of [`fix_all`]: unlike the others it
//! needs a [`crate::config::Kw001Options`] to know which functions qualify,
//! and rewrites call sites across a whole project rather than one file in
//! isolation, so callers apply it as a separate, explicit step (see
//! [`super::kw001::fix_keyword_only`]).

use crate::config::Configuration;
use crate::parser::parse;

/// The largest number of passes [`fix_all`] will run before giving up and
/// returning whatever it has -- guards against a pathological fixer loop
/// that keeps alternating between two forms.
pub const MAX_ITERATIONS: usize = 5;

/// Apply all str-to-str fixers in dependency order:
///
/// 1. TYP010 -- modernize typing syntax, may remove imports.
/// 2. IMP001 -- move in-function imports to module level.
/// 3. TYP002 -- add `-> None` to trivial functions.
/// 4. TYP003 -- add variable type annotations.
///
/// Runs to a fixpoint (or [`MAX_ITERATIONS`], whichever comes first) since
/// an earlier fixer's edits can expose new opportunities for an earlier
/// stage (e.g. TYP002 filling in a variable used by a subsequent TYP003
/// candidate) -- the original runs the chain once per file per CLI
/// invocation and relies on callers re-running `--fix` to converge; running
/// to a fixpoint here gets the same result in one call.
pub fn fix_all(source: &str, config: &Configuration) -> String {
    let mut current = source.to_string();
    for _ in 0..MAX_ITERATIONS {
        let next = fix_once(&current, config);
        if next == current {
            return next;
        }
        current = next;
    }
    current
}

fn fix_once(source: &str, config: &Configuration) -> String {
    let mut current = source.to_string();

    if config.is_rule_enabled(crate::registry::RuleCode::Typ010) {
        if let Ok(parsed) = parse(&current) {
            current = super::typ010::fix_legacy_typing(&current, &parsed.module);
        }
    }
    if config.is_rule_enabled(crate::registry::RuleCode::Imp001) {
        if let Ok(parsed) = parse(&current) {
            current = super::imp001::fix_local_imports(&current, &parsed.module);
        }
    }
    if config.is_rule_enabled(crate::registry::RuleCode::Typ002) {
        if let Ok(parsed) = parse(&current) {
            current = super::typ002::fix_missing_return_none(&current, &parsed.module);
        }
    }
    if config.is_rule_enabled(crate::registry::RuleCode::Typ003) {
        if let Ok(parsed) = parse(&current) {
            current = super::typ003::fix_missing_variable_annotations(&current, &parsed.module);
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_typ010_then_typ002() {
        let source = "from typing import Optional\n\ndef f() -> Optional[int]:\n    print(1)\n";
        let fixed = fix_all(source, &Configuration::default());
        assert!(fixed.contains("def f() -> int | None:"));
    }

    #[test]
    fn leaves_already_fixed_source_unchanged() {
        let source = "x: int = 1\n";
        let fixed = fix_all(source, &Configuration::default());
        assert_eq!(fixed, source);
    }
}
