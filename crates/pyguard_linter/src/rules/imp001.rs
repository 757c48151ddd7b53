//! IMP001: imports performed inside a function body, which should usually
//! live at module scope unless guarded by `TYPE_CHECKING` or a
//! `try/except ImportError`. Grounded on `original_source/rules/imp001.py`
//! and the import-collector logic in `original_source/fixers/imp001.py`.

use crate::ast::{Expr, If, Module, Stmt, Try};
use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::{Rule, RuleCode};

pub struct Imp001;

impl Rule for Imp001 {
    fn code(&self) -> RuleCode {
        RuleCode::Imp001
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let mut diagnostics = Vec::new();
        visit(&module.body, 0, false, severity, &mut diagnostics);
        diagnostics
    }
}

fn visit(body: &[Stmt], depth: u32, guarded: bool, severity: Severity, out: &mut Vec<Diagnostic>) {
    for stmt in body {
        match stmt {
            Stmt::Import(imp) if depth > 0 && !guarded => {
                for alias in &imp.names {
                    emit(&alias.name, imp.span, severity, out);
                }
            }
            Stmt::ImportFrom(imp) if depth > 0 && !guarded => {
                let module_name = imp.module.clone().unwrap_or_else(|| ".".repeat(imp.level as usize));
                for alias in &imp.names {
                    emit(&format!("{module_name}.{}", alias.name), imp.span, severity, out);
                }
            }
            Stmt::FunctionDef(f) => visit(&f.body, depth + 1, false, severity, out),
            Stmt::ClassDef(c) => visit(&c.body, depth, guarded, severity, out),
            Stmt::If(i) => visit_if(i, depth, guarded, severity, out),
            Stmt::Try(t) => visit_try(t, depth, guarded, severity, out),
            _ => {}
        }
    }
}

fn visit_if(stmt: &If, depth: u32, guarded: bool, severity: Severity, out: &mut Vec<Diagnostic>) {
    let body_guarded = guarded || is_type_checking(&stmt.test);
    visit(&stmt.body, depth, body_guarded, severity, out);
    visit(&stmt.orelse, depth, guarded, severity, out);
}

fn visit_try(stmt: &Try, depth: u32, guarded: bool, severity: Severity, out: &mut Vec<Diagnostic>) {
    // If any handler catches ImportError/ModuleNotFoundError, or is a bare
    // `except:`, the whole try/except is treated as a guarded import
    // fallback -- body, every handler, `else`, and `finally` all inherit the
    // guard, matching how the original walks the whole node under one guard
    // flag rather than singling out the matching handler.
    let catches_import_error = stmt
        .handlers
        .iter()
        .any(|h| h.kind.as_ref().map_or(true, is_import_error));
    let inner_guarded = guarded || catches_import_error;
    visit(&stmt.body, depth, inner_guarded, severity, out);
    visit(&stmt.orelse, depth, inner_guarded, severity, out);
    visit(&stmt.finalbody, depth, inner_guarded, severity, out);
    for handler in &stmt.handlers {
        visit(&handler.body, depth, inner_guarded, severity, out);
    }
}

fn is_type_checking(expr: &Expr) -> bool {
    expr.dotted_name()
        .is_some_and(|name| name == "TYPE_CHECKING" || name.ends_with(".TYPE_CHECKING"))
}

fn is_import_error(expr: &Expr) -> bool {
    match expr {
        Expr::Tuple(t) => t.elts.iter().any(is_import_error),
        _ => expr.dotted_name().is_some_and(|name| {
            matches!(name.rsplit('.').next(), Some("ImportError" | "ModuleNotFoundError"))
        }),
    }
}

fn emit(name: &str, span: crate::position::SourceSpan, severity: Severity, out: &mut Vec<Diagnostic>) {
    out.push(Diagnostic::new(
        std::sync::Arc::from(""),
        span,
        "IMP001",
        format!("Import '{name}' should be moved to module level"),
        severity,
        None,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn flags_unguarded_local_import() {
        let source = "def f():\n    import json\n    return json.dumps({})\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn exempts_try_except_import_error() {
        let source = "def f():\n    try:\n        import simplejson as json\n    except ImportError:\n        import json\n    return json\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn module_level_imports_are_never_flagged() {
        let source = "import os\n\ndef f():\n    return os.getcwd()\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exempts_try_except_module_not_found_error() {
        let source = "def f():\n    try:\n        import ujson as json\n    except ModuleNotFoundError:\n        import json\n    return json\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exempts_bare_except() {
        let source = "def f():\n    try:\n        import ujson as json\n    except:\n        import json\n    return json\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn flags_each_alias_of_a_from_import() {
        let source = "def f():\n    from os import path, sep\n    return path, sep\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Imp001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("'os.path'"));
        assert!(diagnostics[1].message.contains("'os.sep'"));
    }
}
