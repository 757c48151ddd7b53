//! TYP010 fixer: rewrite legacy `typing` generics to builtin generics and
//! `|` unions, then drop `typing` imports that become unused. Grounded on
//! `original_source/fixers/typ010.py`'s libcst transform, adapted to this
//! crate's own AST/span model in place of a concrete syntax tree.

use std::collections::HashSet;

use crate::ast::{Expr, FunctionDef, ImportFrom, Module, Stmt};
use crate::rules::typ010::{modernize, TypingAliases};

use super::edits::{apply_edits_checked, Edit};

pub fn fix_legacy_typing(source: &str, module: &Module) -> String {
    let aliases = TypingAliases::collect(module);
    let mut edits = Vec::new();
    let mut touched = false;
    for stmt in module.walk_statements() {
        match stmt {
            Stmt::FunctionDef(f) => collect_function(f, &aliases, &mut edits, &mut touched),
            Stmt::AnnAssign(a) => collect_annotation(&a.annotation, &aliases, &mut edits, &mut touched),
            _ => {}
        }
    }
    if !touched {
        return source.to_string();
    }
    for stmt in module.walk_statements() {
        if let Stmt::ImportFrom(imp) = stmt {
            if let Some(edit) = cleanup_import(imp, &aliases) {
                edits.push(edit);
            }
        }
    }
    apply_edits_checked(source, edits)
}

fn collect_function(f: &FunctionDef, aliases: &TypingAliases, edits: &mut Vec<Edit>, touched: &mut bool) {
    for arg in f.args.positional_params().chain(f.args.kwonlyargs.iter()) {
        if let Some(annotation) = &arg.annotation {
            collect_annotation(annotation, aliases, edits, touched);
        }
    }
    if let Some(returns) = &f.returns {
        collect_annotation(returns, aliases, edits, touched);
    }
}

fn collect_annotation(annotation: &Expr, aliases: &TypingAliases, edits: &mut Vec<Edit>, touched: &mut bool) {
    let (modernized, changed) = modernize(annotation, aliases);
    if !changed {
        return;
    }
    *touched = true;
    let span = annotation.span();
    let Some(end) = span.end else { return };
    if span.start.line != end.line {
        // Multi-line annotations are vanishingly rare and not worth the
        // added complexity of a multi-line splice; leave them for the
        // rule to keep flagging.
        return;
    }
    edits.push(Edit::replace(span.start.line, span.start.column, end.column, modernized));
}

/// Drop `typing` import aliases that are no longer referenced once every
/// legacy annotation in the module has been rewritten. Mirrors
/// `_ImportCleaner`, but -- since edits here are textual, not CST-level --
/// only handles single-line `from typing import ...` statements; anything
/// spanning multiple lines is left alone.
fn cleanup_import(imp: &ImportFrom, aliases: &TypingAliases) -> Option<Edit> {
    if imp.module.as_deref() != Some("typing") {
        return None;
    }
    let end = imp.span.end?;
    if imp.span.start.line != end.line {
        return None;
    }
    let removable: HashSet<&str> = aliases.canonical_names();
    let kept: Vec<String> = imp
        .names
        .iter()
        .filter(|alias| !removable.contains(alias.name.as_str()))
        .map(|alias| match &alias.asname {
            Some(asname) => format!("{} as {asname}", alias.name),
            None => alias.name.clone(),
        })
        .collect();
    if kept.len() == imp.names.len() {
        return None;
    }
    let replacement = if kept.is_empty() {
        String::new()
    } else {
        format!("from typing import {}", kept.join(", "))
    };
    Some(Edit::replace(imp.span.start.line, imp.span.start.column, end.column, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn modernizes_optional_dict_list_and_drops_import() {
        let source = "from typing import Dict, List, Optional\n\ndef f() -> Optional[Dict[str, List[int]]]:\n    return None\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_legacy_typing(source, &parsed.module);
        assert!(fixed.contains("def f() -> dict[str, list[int]] | None:"));
        assert!(!fixed.contains("from typing import"));
    }

    #[test]
    fn keeps_import_for_names_still_in_use() {
        let source = "from typing import Dict, Any\n\ndef f() -> Dict[str, Any]:\n    return {}\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_legacy_typing(source, &parsed.module);
        assert!(fixed.contains("from typing import Any"));
        assert!(fixed.contains("def f() -> dict[str, Any]:"));
    }

    #[test]
    fn leaves_modern_annotations_untouched() {
        let source = "def f() -> dict[str, int] | None:\n    return None\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_legacy_typing(source, &parsed.module);
        assert_eq!(fixed, source);
    }
}
