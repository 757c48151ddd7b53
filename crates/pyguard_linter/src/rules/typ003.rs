//! TYP003: module/class-level (and optionally local) variable assignments
//! missing a type annotation. Only plain `Assign` triggers -- `AnnAssign`
//! already has one and `AugAssign` can't introduce a new binding. Grounded
//! on `original_source/rules/typ003.py`.

use crate::ast::{Expr, Module, Stmt};
use crate::config::AnnotationScope;
use crate::diagnostic::Diagnostic;
use crate::registry::{Rule, RuleCode};

pub struct Typ003;

impl Rule for Typ003 {
    fn code(&self) -> RuleCode {
        RuleCode::Typ003
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let scopes = &config.rules.typ003.scope;
        let mut diagnostics = Vec::new();
        visit_body(&module.body, AnnotationScope::Module, scopes, severity, &mut diagnostics);
        diagnostics
    }
}

fn visit_body(
    body: &[Stmt],
    scope: AnnotationScope,
    enabled_scopes: &std::collections::HashSet<AnnotationScope>,
    severity: crate::diagnostic::Severity,
    out: &mut Vec<Diagnostic>,
) {
    for stmt in body {
        match stmt {
            Stmt::Assign(assign) if enabled_scopes.contains(&scope) => {
                for target in &assign.targets {
                    if let Expr::Name(name) = target {
                        if name.id == "_" {
                            continue;
                        }
                        out.push(Diagnostic::new(
                            std::sync::Arc::from(""),
                            name.span,
                            "TYP003",
                            format!("'{}' is missing a type annotation", name.id),
                            severity,
                            None,
                        ));
                    }
                }
            }
            Stmt::ClassDef(c) => {
                visit_body(&c.body, AnnotationScope::Class, enabled_scopes, severity, out);
            }
            Stmt::FunctionDef(f) => {
                visit_body(&f.body, AnnotationScope::Local, enabled_scopes, severity, out);
            }
            Stmt::If(i) => {
                visit_body(&i.body, scope, enabled_scopes, severity, out);
                visit_body(&i.orelse, scope, enabled_scopes, severity, out);
            }
            Stmt::Try(t) => {
                visit_body(&t.body, scope, enabled_scopes, severity, out);
                visit_body(&t.orelse, scope, enabled_scopes, severity, out);
                visit_body(&t.finalbody, scope, enabled_scopes, severity, out);
                for handler in &t.handlers {
                    visit_body(&handler.body, scope, enabled_scopes, severity, out);
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
    fn flags_module_level_assignment_without_annotation() {
        let parsed = parse("x = 1\n").unwrap();
        let diagnostics = Typ003.check(&parsed.module, &parsed.source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn does_not_flag_local_assignment_by_default() {
        let parsed = parse("def f():\n    x = 1\n    return x\n").unwrap();
        let diagnostics = Typ003.check(&parsed.module, &parsed.source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exempts_underscore() {
        let parsed = parse("_ = 1\n").unwrap();
        let diagnostics = Typ003.check(&parsed.module, &parsed.source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }
}
