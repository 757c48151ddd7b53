//! TYP001: missing type annotations on function parameters and return
//! values. Grounded on `original_source/rules/typ001.py`.

use crate::ast::{FunctionDef, Module, Stmt};
use crate::config::Configuration;
use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::{Rule, RuleCode};

pub struct Typ001;

impl Rule for Typ001 {
    fn code(&self) -> RuleCode {
        RuleCode::Typ001
    }

    fn check(&self, module: &Module, _source: &str, config: &Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let opts = &config.rules.typ001;
        let mut diagnostics = Vec::new();
        visit_body(&module.body, false, opts, severity, &mut diagnostics);
        diagnostics
    }
}

fn visit_body(
    body: &[Stmt],
    in_class: bool,
    opts: &crate::config::Typ001Options,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(f) => {
                check_function(f, in_class, opts, severity, out);
                visit_body(&f.body, false, opts, severity, out);
            }
            Stmt::ClassDef(c) => visit_body(&c.body, true, opts, severity, out),
            Stmt::If(i) => {
                visit_body(&i.body, in_class, opts, severity, out);
                visit_body(&i.orelse, in_class, opts, severity, out);
            }
            Stmt::Try(t) => {
                visit_body(&t.body, in_class, opts, severity, out);
                visit_body(&t.orelse, in_class, opts, severity, out);
                visit_body(&t.finalbody, in_class, opts, severity, out);
                for handler in &t.handlers {
                    visit_body(&handler.body, in_class, opts, severity, out);
                }
            }
            _ => {}
        }
    }
}

fn check_function(
    f: &FunctionDef,
    in_class: bool,
    opts: &crate::config::Typ001Options,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    if opts.exempt_dunder && crate::rules::is_dunder(&f.name) {
        return;
    }

    let mut params = f.args.posonlyargs.iter().chain(f.args.args.iter());
    let mut index = 0usize;
    for arg in &mut params {
        let is_self_or_cls =
            index == 0 && in_class && opts.exempt_self_cls && matches!(arg.name.as_str(), "self" | "cls");
        index += 1;
        if is_self_or_cls || arg.annotation.is_some() {
            continue;
        }
        out.push(Diagnostic::new(
            std::sync::Arc::from(""),
            arg.span,
            "TYP001",
            format!(
                "Parameter '{}' of '{}' is missing a type annotation",
                arg.name, f.name
            ),
            severity,
            None,
        ));
    }
    for arg in &f.args.kwonlyargs {
        if arg.annotation.is_none() {
            out.push(Diagnostic::new(
                std::sync::Arc::from(""),
                arg.span,
                "TYP001",
                format!(
                    "Parameter '{}' of '{}' is missing a type annotation",
                    arg.name, f.name
                ),
                severity,
                None,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn flags_missing_param_annotations() {
        let parsed = parse("def f(a, b):\n    return a + b\n").unwrap();
        let config = Configuration::default();
        let diagnostics = Typ001.check(&parsed.module, &parsed.source, &config);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn exempts_self_and_dunder() {
        let parsed = parse("class C:\n    def __init__(self, a: int) -> None:\n        pass\n").unwrap();
        let config = Configuration::default();
        let diagnostics = Typ001.check(&parsed.module, &parsed.source, &config);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn flags_self_when_function_is_not_a_method() {
        let parsed = parse("def helper(self, x: int):\n    return x\n").unwrap();
        let config = Configuration::default();
        let diagnostics = Typ001.check(&parsed.module, &parsed.source, &config);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'self'"));
    }

    #[test]
    fn does_not_check_vararg_or_kwarg() {
        let parsed = parse("def f(*args, **kwargs):\n    pass\n").unwrap();
        let config = Configuration::default();
        let diagnostics = Typ001.check(&parsed.module, &parsed.source, &config);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn single_diagnostic_for_one_missing_param() {
        let parsed = parse("def process(x: int, y: str, z):\n    return x\n").unwrap();
        let config = Configuration::default();
        let diagnostics = Typ001.check(&parsed.module, &parsed.source, &config);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'z'"));
    }
}
