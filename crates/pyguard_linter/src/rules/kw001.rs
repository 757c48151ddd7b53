//! KW001: functions/methods with enough positional parameters that callers
//! would benefit from keyword-only arguments. Grounded on
//! `original_source/rules/kw001.py`.

use crate::ast::{Decorator, Module, Stmt};
use crate::config::Kw001Options;
use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::{Rule, RuleCode};

pub struct Kw001;

impl Rule for Kw001 {
    fn code(&self) -> RuleCode {
        RuleCode::Kw001
    }

    fn check(&self, module: &Module, _source: &str, config: &crate::config::Configuration) -> Vec<Diagnostic> {
        let Some(severity) = config.severity_for(self.code()) else {
            return Vec::new();
        };
        let opts = &config.rules.kw001;
        let mut diagnostics = Vec::new();
        visit_body(&module.body, false, opts, severity, &mut diagnostics);
        diagnostics
    }
}

fn visit_body(
    body: &[Stmt],
    in_class: bool,
    opts: &Kw001Options,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(f) => {
                let exempt = (opts.exempt_dunder && crate::rules::is_dunder(&f.name))
                    || (opts.exempt_private && crate::rules::is_private(&f.name))
                    || (opts.exempt_overrides && has_override_decorator(&f.decorators));

                if !exempt && !f.args.has_star_separator {
                    let positional_count = f.args.positional_params().count();
                    let offset = if in_class && positional_count > 0 { 1 } else { 0 };
                    let effective_count = positional_count.saturating_sub(offset);
                    if effective_count >= opts.min_params {
                        let kind = if in_class { "Method" } else { "Function" };
                        out.push(Diagnostic::new(
                            std::sync::Arc::from(""),
                            f.header_span,
                            "KW001",
                            format!(
                                "{kind} '{}' should use keyword-only parameters (add * separator)",
                                f.name
                            ),
                            severity,
                            None,
                        ));
                    }
                }
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

pub(crate) fn has_override_decorator(decorators: &[Decorator]) -> bool {
    decorators.iter().any(|d| {
        d.expr
            .dotted_name()
            .or_else(|| match &d.expr {
                crate::ast::Expr::Call(c) => c.func.dotted_name(),
                _ => None,
            })
            .is_some_and(|name| name == "override" || name.ends_with(".override"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::parse;

    #[test]
    fn flags_method_with_enough_positional_params() {
        let source = "class C:\n    def compute(self, a: int, b: int, op: str) -> int:\n        return a\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Kw001.check(&parsed.module, source, &Configuration::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Method 'compute' should use keyword-only parameters (add * separator)"
        );
    }

    #[test]
    fn exempts_dunder_and_override() {
        let source = "class C:\n    def __init__(self, a, b, c):\n        pass\n\n    @override\n    def run(self, a, b, c):\n        pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Kw001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn already_keyword_only_is_fine() {
        let source = "def f(a, *, b, c):\n    pass\n";
        let parsed = parse(source).unwrap();
        let diagnostics = Kw001.check(&parsed.module, source, &Configuration::default());
        assert!(diagnostics.is_empty());
    }
}
