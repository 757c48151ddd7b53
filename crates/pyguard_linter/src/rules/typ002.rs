//! TYP002: functions missing a return type annotation. Grounded on
//! `original_source/rules/typ002.py`.

use crate::ast::{Module, Stmt};
use crate::diagnostic::Diagnostic;
use crate::registry::{Rule, RuleCode};

pub struct Typ002;

impl Rule for Typ002 {
    fn code(&self) -> RuleCode {
        RuleCode::Typ002
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let mut diagnostics = Vec::new();
        for stmt in module.walk_statements() {
            if let Stmt::FunctionDef(f) = stmt {
                if crate::rules::is_dunder(&f.name) {
                    continue;
                }
                if f.returns.is_none() {
                    diagnostics.push(Diagnostic::new(
                        std::sync::Arc::from(""),
                        f.header_span,
                        "TYP002",
                        format!("Missing return type annotation for function '{}'", f.name),
                        severity,
                        None,
                    ));
                }
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn flags_implicit_none_return() {
        let parsed = parse("def f(x: int):\n    print(x)\n").unwrap();
        let diagnostics = Typ002.check(&parsed.module, &parsed.source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn flags_function_that_returns_a_value_but_lacks_annotation() {
        let parsed = parse("def f(x: int):\n    return x\n").unwrap();
        let diagnostics = Typ002.check(&parsed.module, &parsed.source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn does_not_flag_annotated_function() {
        let parsed = parse("def f(x: int) -> int:\n    return x\n").unwrap();
        let diagnostics = Typ002.check(&parsed.module, &parsed.source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exempts_dunder() {
        let parsed = parse("class C:\n    def __init__(self):\n        pass\n").unwrap();
        let diagnostics = Typ002.check(&parsed.module, &parsed.source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }
}
