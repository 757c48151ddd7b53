//! EXP002: missing module-level exports list. Grounded on
//! `original_source/rules/exp002.py` ("Enforce `__all__` or explicit
//! re-export policy").
//!
//! A module that defines public (non-underscore) top-level functions,
//! classes, or names but never assigns `__all__` leaves its export surface
//! implicit -- every top-level name becomes part of the public API by
//! accident of `import *`.

use crate::ast::{Expr, Module, Stmt};
use crate::diagnostic::Diagnostic;
use crate::registry::{Rule, RuleCode};

pub struct Exp002;

impl Rule for Exp002 {
    fn code(&self) -> RuleCode {
        RuleCode::Exp002
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        if !has_public_symbol(&module.body) || has_all_assignment(&module.body) {
            return Vec::new();
        }
        vec![Diagnostic::new(
            std::sync::Arc::from(""),
            crate::position::SourceSpan::point(1, 1),
            "EXP002",
            "Module has public symbols but no '__all__' declaration".to_string(),
            severity,
            None,
        )]
    }
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

fn has_public_symbol(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::FunctionDef(f) => is_public(&f.name),
        Stmt::ClassDef(c) => is_public(&c.name),
        Stmt::Assign(a) => a.targets.iter().any(is_public_target),
        Stmt::AnnAssign(a) => is_public_target(&a.target),
        Stmt::AugAssign(a) => is_public_target(&a.target),
        _ => false,
    })
}

fn is_public_target(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(n) if is_public(&n.id))
}

fn has_all_assignment(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::Assign(a) => a.targets.iter().any(|t| is_named(t, "__all__")),
        Stmt::AnnAssign(a) => is_named(&a.target, "__all__"),
        Stmt::AugAssign(a) => is_named(&a.target, "__all__"),
        _ => false,
    })
}

fn is_named(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Name(n) if n.id == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    fn enabled_config() -> Configuration {
        let mut config = Configuration::default();
        config.rules.severities.insert(RuleCode::Exp002, crate::registry::ConfigSeverity::Warn);
        config
    }

    #[test]
    fn flags_module_with_public_function_and_no_all() {
        let source = "def greet():\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp002.check(&parsed.module, source, &enabled_config());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line(), 1);
        assert_eq!(diagnostics[0].location.column(), 1);
    }

    #[test]
    fn does_not_flag_when_all_is_declared() {
        let source = "__all__ = [\"greet\"]\n\ndef greet():\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp002.check(&parsed.module, source, &enabled_config());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn does_not_flag_module_with_only_private_symbols() {
        let source = "def _helper():\n    pass\n\n_cache = {}\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp002.check(&parsed.module, source, &enabled_config());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn off_by_default() {
        let source = "def greet():\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Exp002.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }
}
