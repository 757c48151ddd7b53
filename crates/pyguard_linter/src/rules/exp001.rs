//! EXP001: nested return types. Grounded on
//! `original_source/rules/exp001.py` ("Structured return types must be
//! module-level").
//!
//! A function annotated to return a single named type (`-> Foo` or the
//! forward-reference spelling `-> "Foo"`) but that itself defines a class
//! named `Foo` in its own body buries a type the caller needs behind the
//! function that produces it -- it should live at module scope instead.

use crate::ast::{ClassDef, ConstantValue, Expr, FunctionDef, Module, Stmt};
use crate::diagnostic::{Diagnostic, Severity};
use crate::position::SourceSpan;
use crate::registry::{Rule, RuleCode};

pub struct Exp001;

impl Rule for Exp001 {
    fn code(&self) -> RuleCode {
        RuleCode::Exp001
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
    let Some(name) = returned_type_name(returns) else { return };
    let Some(class) = find_class_named(&f.body, &name) else { return };
    let span = report_span(class);
    out.push(Diagnostic::new(
        std::sync::Arc::from(""),
        span,
        "EXP001",
        format!("Class '{name}' used as a return type should be defined at module level"),
        severity,
        None,
    ));
}

/// The single identifier a return annotation names, whether spelled as a
/// bare name (`-> Foo`) or a forward-reference string (`-> "Foo"`).
fn returned_type_name(annotation: &Expr) -> Option<String> {
    match annotation {
        Expr::Name(n) => Some(n.id.clone()),
        Expr::Constant(c) => match &c.value {
            ConstantValue::Str(s) => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn report_span(class: &ClassDef) -> SourceSpan {
    class.decorators.first().map_or(class.span, |d| d.expr.span())
}

/// Find a class named `name` directly in `body`, descending into `if`/`try`
/// branches but never into a nested function's own body.
fn find_class_named<'a>(body: &'a [Stmt], name: &str) -> Option<&'a ClassDef> {
    for stmt in body {
        match stmt {
            Stmt::ClassDef(c) if c.name == name => return Some(c),
            Stmt::ClassDef(_) | Stmt::FunctionDef(_) => {}
            Stmt::If(i) => {
                if let Some(c) = find_class_named(&i.body, name) {
                    return Some(c);
                }
                if let Some(c) = find_class_named(&i.orelse, name) {
                    return Some(c);
                }
            }
            Stmt::Try(t) => {
                if let Some(c) = find_class_named(&t.body, name) {
                    return Some(c);
                }
                if let Some(c) = find_class_named(&t.orelse, name) {
                    return Some(c);
                }
                if let Some(c) = find_class_named(&t.finalbody, name) {
                    return Some(c);
                }
                for handler in &t.handlers {
                    if let Some(c) = find_class_named(&handler.body, name) {
                        return Some(c);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn flags_class_nested_inside_function_it_is_returned_from() {
        let source = "def make() -> Result:\n    class Result:\n        pass\n    return Result()\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Class 'Result' used as a return type should be defined at module level"
        );
    }

    #[test]
    fn flags_forward_reference_string_annotation() {
        let source = "def make() -> \"Result\":\n    class Result:\n        pass\n    return Result()\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn does_not_flag_module_level_class_used_as_return_type() {
        let source = "class Result:\n    pass\n\ndef make() -> Result:\n    return Result()\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn does_not_flag_unrelated_nested_class() {
        let source = "def make() -> int:\n    class Helper:\n        pass\n    return 1\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }
}
