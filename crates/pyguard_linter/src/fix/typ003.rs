//! TYP003 fixer: add a type annotation to assignments whose value's type is
//! unambiguously inferable (a literal or a builtin constructor call).
//! Grounded on `original_source/fixers/typ003.py`.
//!
//! No scope analysis is performed -- if a builtin name like `list` has been
//! rebound locally the inferred annotation may be wrong, exactly as the
//! original notes.

use crate::ast::{ConstantValue, Expr, Module, Stmt};
use crate::lexer::{self, TokenKind};

use super::edits::{apply_edits_checked, Edit};

const BUILTIN_CONSTRUCTORS: &[&str] = &[
    "int", "float", "str", "bytes", "bool", "complex", "list", "dict", "set", "frozenset", "tuple",
    "bytearray",
];

pub fn fix_missing_variable_annotations(source: &str, module: &Module) -> String {
    let Ok(tokens) = lexer::tokenize(source) else {
        return source.to_string();
    };
    let mut edits = Vec::new();
    collect(&module.body, &tokens, &mut edits);
    apply_edits_checked(source, edits)
}

fn collect(body: &[Stmt], tokens: &[lexer::Token], out: &mut Vec<Edit>) {
    for stmt in body {
        match stmt {
            Stmt::Assign(assign) if assign.targets.len() == 1 => {
                if let Expr::Name(name) = &assign.targets[0] {
                    if name.id != "_" {
                        if let Some(type_name) = infer_type_annotation(&assign.value) {
                            if let Some(edit) = find_name_end(tokens, &name.id, name.span.line(), name.span.column())
                            {
                                out.push(Edit::insert(edit.0, edit.1, format!(": {type_name}")));
                            }
                        }
                    }
                }
            }
            Stmt::ClassDef(c) => collect(&c.body, tokens, out),
            Stmt::FunctionDef(f) => collect(&f.body, tokens, out),
            Stmt::If(i) => {
                collect(&i.body, tokens, out);
                collect(&i.orelse, tokens, out);
            }
            Stmt::Try(t) => {
                collect(&t.body, tokens, out);
                collect(&t.orelse, tokens, out);
                collect(&t.finalbody, tokens, out);
                for handler in &t.handlers {
                    collect(&handler.body, tokens, out);
                }
            }
            _ => {}
        }
    }
}

/// A literal or builtin-constructor-call value whose type is unambiguous.
/// [`ConstantValue`] only distinguishes `None`/bool/str from everything
/// else, so numeric literals (which no rule needs to tell apart) fall
/// into `Other` and aren't annotated here; a builtin constructor call like
/// `list()` still infers fine via the `Call` arm below.
fn infer_type_annotation(value: &Expr) -> Option<&'static str> {
    match value {
        Expr::Constant(c) => match &c.value {
            ConstantValue::Bool(_) => Some("bool"),
            ConstantValue::Str(_) => Some("str"),
            ConstantValue::None | ConstantValue::Other => None,
        },
        Expr::Call(call) => {
            let name = call.func.dotted_name()?;
            BUILTIN_CONSTRUCTORS
                .iter()
                .find(|c| **c == name)
                .copied()
        }
        _ => None,
    }
}

/// Find the `(line, col)` just past the `NAME` token at `(line, col)`.
fn find_name_end(tokens: &[lexer::Token], name: &str, line: u32, col: u32) -> Option<(u32, u32)> {
    tokens.iter().find_map(|tok| match &tok.kind {
        TokenKind::Name(n) if n == name && tok.start.line == line && tok.start.column == col => {
            Some((tok.end.line, tok.end.column))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn annotates_string_literal_assignment() {
        let source = "x = \"hello\"\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_variable_annotations(source, &parsed.module);
        assert_eq!(fixed, "x: str = \"hello\"\n");
    }

    #[test]
    fn annotates_builtin_constructor_call() {
        let source = "items = list()\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_variable_annotations(source, &parsed.module);
        assert_eq!(fixed, "items: list = list()\n");
    }

    #[test]
    fn leaves_underscore_and_none_alone() {
        let source = "_ = \"skip\"\ny = None\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_variable_annotations(source, &parsed.module);
        assert_eq!(fixed, source);
    }
}
