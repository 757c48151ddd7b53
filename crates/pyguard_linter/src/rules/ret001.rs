//! RET001: heterogeneous tuple returns. Grounded on
//! `original_source/rules/ret001.py`.
//!
//! A function whose return annotation is a fixed-length, multi-element
//! `tuple[T1, T2, ...]` (or dotted `typing.Tuple[...]`) shape -- excluding
//! the variadic `tuple[T, ...]` form -- packs heterogeneous values into one
//! return value. Every `return <value>` in the function's own body (not
//! nested defs) gets a diagnostic pointing at the `return` itself.

use crate::ast::{Expr, FunctionDef, Module, Stmt};
use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::{Rule, RuleCode};
use crate::render::render_expr;

pub struct Ret001;

impl Rule for Ret001 {
    fn code(&self) -> RuleCode {
        RuleCode::Ret001
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let mut diagnostics = Vec::new();
        for stmt in module.walk_statements() {
            if let Stmt::FunctionDef(f) = stmt {
                check_function(f, severity, &mut diagnostics);
            }
        }
        diagnostics
    }
}

fn check_function(f: &FunctionDef, severity: Severity, out: &mut Vec<Diagnostic>) {
    let Some(returns) = &f.returns else { return };
    if !is_heterogeneous_tuple_annotation(returns) {
        return;
    }
    let mut returns_with_value = Vec::new();
    collect_returns(&f.body, &mut returns_with_value);
    for r in returns_with_value {
        out.push(Diagnostic::new(
            std::sync::Arc::from(""),
            r.span,
            "RET001",
            "Avoid tuple packing for return values; use a dataclass or NamedTuple".to_string(),
            severity,
            None,
        ));
    }
}

fn is_heterogeneous_tuple_annotation(annotation: &Expr) -> bool {
    let Expr::Subscript(sub) = annotation else { return false };
    let is_tuple_base = match sub.value.as_ref() {
        Expr::Name(n) => n.id == "tuple" || n.id == "Tuple",
        Expr::Attribute(a) => a.attr == "tuple" || a.attr == "Tuple",
        _ => false,
    };
    if !is_tuple_base {
        return false;
    }
    let Expr::Tuple(slice) = sub.slice.as_ref() else { return false };
    if slice.elts.len() < 2 {
        return false;
    }
    // Exclude the variadic form `tuple[T, ...]`.
    !(slice.elts.len() == 2 && render_expr(&slice.elts[1]) == "...")
}

fn collect_returns<'a>(body: &'a [Stmt], out: &mut Vec<&'a crate::ast::Return>) {
    for stmt in body {
        match stmt {
            Stmt::Return(r) => {
                if r.value.is_some() {
                    out.push(r);
                }
            }
            Stmt::FunctionDef(_) | Stmt::ClassDef(_) => {}
            Stmt::If(i) => {
                collect_returns(&i.body, out);
                collect_returns(&i.orelse, out);
            }
            Stmt::Try(t) => {
                collect_returns(&t.body, out);
                collect_returns(&t.orelse, out);
                collect_returns(&t.finalbody, out);
                for handler in &t.handlers {
                    collect_returns(&handler.body, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn flags_heterogeneous_tuple_return() {
        let source = "def f(x: int) -> tuple[int, str]:\n    if x:\n        return 1, \"a\"\n    return 2, \"b\"\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Ret001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "Avoid tuple packing for return values; use a dataclass or NamedTuple"
        );
    }

    #[test]
    fn does_not_flag_variadic_tuple_annotation() {
        let source = "def f() -> tuple[int, ...]:\n    return (1, 2, 3)\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Ret001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn does_not_flag_non_tuple_return_annotation() {
        let source = "def f() -> int:\n    return 1\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Ret001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ignores_nested_function_returns() {
        let source = "def f() -> tuple[int, str]:\n    def g():\n        return\n    return 1, \"a\"\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Ret001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }
}
