//! TYP010: legacy `typing` generics (`Dict`, `List`, `Optional`, `Union`,
//! ...) that should be written as builtin generics and `|` unions.
//! Grounded on `original_source/rules/typ010.py`'s recursive
//! `_modernize`/`_check_annotation`, tracking `typing` import aliases the
//! same way (`_typing_imports`).

use std::collections::{HashMap, HashSet};

use crate::ast::{Expr, FunctionDef, Module, Stmt};
use crate::diagnostic::Diagnostic;
use crate::registry::{Rule, RuleCode};
use crate::render::render_expr;

const LEGACY_NAMES: &[&str] = &[
    "Dict", "List", "Set", "FrozenSet", "Tuple", "Type", "Optional", "Union",
];

pub struct Typ010;

impl Rule for Typ010 {
    fn code(&self) -> RuleCode {
        RuleCode::Typ010
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let aliases = TypingAliases::collect(module);
        let mut diagnostics = Vec::new();
        for stmt in module.walk_statements() {
            match stmt {
                Stmt::FunctionDef(f) => check_function(f, &aliases, severity, &mut diagnostics),
                Stmt::AnnAssign(a) => {
                    check_annotation(&a.annotation, &aliases, severity, &mut diagnostics)
                }
                _ => {}
            }
        }
        diagnostics
    }
}

fn check_function(
    f: &FunctionDef,
    aliases: &TypingAliases,
    severity: crate::diagnostic::Severity,
    out: &mut Vec<Diagnostic>,
) {
    let params = f
        .args
        .positional_params()
        .chain(f.args.kwonlyargs.iter())
        .chain(f.args.vararg.iter())
        .chain(f.args.kwarg.iter());
    for arg in params {
        if let Some(annotation) = &arg.annotation {
            check_annotation(annotation, aliases, severity, out);
        }
    }
    if let Some(returns) = &f.returns {
        check_annotation(returns, aliases, severity, out);
    }
}

/// Finds the outermost legacy typing node(s) in an annotation and reports
/// one diagnostic per independent legacy subtree: if the node itself is a
/// legacy subscript, the whole node is reported and modernized as a unit;
/// otherwise we descend into a non-legacy subscript's slice (and `|` union
/// operands) looking for legacy constructs nested inside, so e.g.
/// `dict[List[int], Dict[str, int]]` yields two diagnostics.
fn check_annotation(
    annotation: &Expr,
    aliases: &TypingAliases,
    severity: crate::diagnostic::Severity,
    out: &mut Vec<Diagnostic>,
) {
    match annotation {
        Expr::Subscript(s) if aliases.legacy_name_of(&s.value).is_some() => {
            let (modernized, _) = modernize(annotation, aliases);
            out.push(Diagnostic::new(
                std::sync::Arc::from(""),
                annotation.span(),
                "TYP010",
                format!(
                    "Use '{modernized}' instead of '{}'",
                    render_expr(annotation)
                ),
                severity,
                None,
            ));
        }
        Expr::Subscript(s) => check_annotation_in_slice(&s.slice, aliases, severity, out),
        Expr::BinOp(b) => {
            check_annotation(&b.left, aliases, severity, out);
            check_annotation(&b.right, aliases, severity, out);
        }
        _ => {}
    }
}

fn check_annotation_in_slice(
    node: &Expr,
    aliases: &TypingAliases,
    severity: crate::diagnostic::Severity,
    out: &mut Vec<Diagnostic>,
) {
    match node {
        Expr::Tuple(t) => {
            for elt in &t.elts {
                check_annotation(elt, aliases, severity, out);
            }
        }
        _ => check_annotation(node, aliases, severity, out),
    }
}

pub(crate) struct TypingAliases {
    /// local name -> canonical typing name, e.g. `"L" -> "List"`.
    names: HashMap<String, String>,
    /// names bound to the `typing` module itself, enabling `typing.Dict`.
    modules: HashSet<String>,
}

impl TypingAliases {
    pub(crate) fn collect(module: &Module) -> Self {
        let mut names = HashMap::new();
        let mut modules = HashSet::new();
        for stmt in module.walk_statements() {
            match stmt {
                Stmt::ImportFrom(imp) if imp.module.as_deref() == Some("typing") => {
                    for alias in &imp.names {
                        if LEGACY_NAMES.contains(&alias.name.as_str()) {
                            let local = alias.asname.clone().unwrap_or_else(|| alias.name.clone());
                            names.insert(local, alias.name.clone());
                        }
                    }
                }
                Stmt::Import(imp) => {
                    for alias in &imp.names {
                        if alias.name == "typing" {
                            modules.insert(alias.asname.clone().unwrap_or_else(|| "typing".to_string()));
                        }
                    }
                }
                _ => {}
            }
        }
        Self { names, modules }
    }

    /// The canonical (pre-alias) typing names collected from `from typing
    /// import ...` statements, used by the TYP010 fixer to decide which
    /// import aliases are safe to drop.
    pub(crate) fn canonical_names(&self) -> HashSet<&str> {
        self.names.values().map(String::as_str).collect()
    }

    /// The canonical legacy name this expression refers to, if any --
    /// either a direct alias (`Dict`) or `typing.Dict` attribute access.
    fn legacy_name_of(&self, expr: &Expr) -> Option<&str> {
        match expr {
            Expr::Name(n) => self.names.get(&n.id).map(String::as_str),
            Expr::Attribute(a) => {
                if let Expr::Name(base) = a.value.as_ref() {
                    if self.modules.contains(&base.id) && LEGACY_NAMES.contains(&a.attr.as_str()) {
                        return Some(a.attr.as_str());
                    }
                }
                None
            }
            _ => None,
        }
    }
}

fn tuple_elements(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Tuple(t) => t.elts.iter().collect(),
        _ => vec![expr],
    }
}

/// Returns the rendered text and whether anything below (or at) this node
/// was modernized.
pub(crate) fn modernize(expr: &Expr, aliases: &TypingAliases) -> (String, bool) {
    match expr {
        Expr::Subscript(s) => {
            if let Some(canonical) = aliases.legacy_name_of(&s.value) {
                let args = tuple_elements(&s.slice);
                let modernized_args: Vec<String> =
                    args.iter().map(|a| modernize(a, aliases).0).collect();
                let text = match canonical {
                    "Dict" => format!("dict[{}]", modernized_args.join(", ")),
                    "List" => format!("list[{}]", modernized_args.join(", ")),
                    "Set" => format!("set[{}]", modernized_args.join(", ")),
                    "FrozenSet" => format!("frozenset[{}]", modernized_args.join(", ")),
                    "Type" => format!("type[{}]", modernized_args.join(", ")),
                    "Tuple" => format!("tuple[{}]", modernized_args.join(", ")),
                    "Optional" => format!("{} | None", modernized_args.join(", ")),
                    "Union" => modernized_args.join(" | "),
                    _ => unreachable!("legacy_name_of only returns names in LEGACY_NAMES"),
                };
                (text, true)
            } else {
                let (value_text, value_changed) = modernize(&s.value, aliases);
                let (slice_text, slice_changed) = modernize(&s.slice, aliases);
                (
                    format!("{value_text}[{slice_text}]"),
                    value_changed || slice_changed,
                )
            }
        }
        Expr::Tuple(t) => {
            let mut changed = false;
            let parts: Vec<String> = t
                .elts
                .iter()
                .map(|e| {
                    let (text, c) = modernize(e, aliases);
                    changed |= c;
                    text
                })
                .collect();
            (parts.join(", "), changed)
        }
        Expr::BinOp(b) => {
            let (left, lc) = modernize(&b.left, aliases);
            let (right, rc) = modernize(&b.right, aliases);
            (format!("{left} | {right}"), lc || rc)
        }
        _ => (render_expr(expr), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn modernizes_nested_optional_dict_list() {
        let source = "from typing import Dict, List, Optional\n\ndef f() -> Optional[Dict[str, List[int]]]:\n    return None\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Typ010.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Use 'dict[str, list[int]] | None' instead of 'Optional[Dict[str, List[int]]]'"
        );
    }

    #[test]
    fn leaves_modern_annotations_alone() {
        let source = "def f() -> dict[str, int] | None:\n    return None\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Typ010.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn recognizes_typing_attribute_access() {
        let source = "import typing\n\ndef f(x: typing.Optional[int]):\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Typ010.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn flags_each_legacy_subtree_inside_a_non_legacy_container() {
        let source = "from typing import List, Dict\n\ndef f(x: dict[List[int], Dict[str, int]]):\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Typ010.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("list[int]"));
        assert!(diagnostics[1].message.contains("dict[str, int]"));
    }

    #[test]
    fn checks_vararg_and_kwarg_annotations() {
        let source = "from typing import List, Dict\n\ndef f(*args: List[int], **kwargs: Dict[str, int]):\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Typ010.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 2);
    }
}
