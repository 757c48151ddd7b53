//! TYP002 fixer: append ` -> None` to functions flagged by the TYP002
//! rule. Grounded on `original_source/fixers/typ002.py`; position-finding
//! re-tokenizes with this crate's own lexer in place of `tokenize`.

use crate::ast::{FunctionDef, Module, Stmt};
use crate::lexer::{self, TokenKind};

use super::edits::{apply_edits_checked, Edit};

pub fn fix_missing_return_none(source: &str, module: &Module) -> String {
    let Ok(tokens) = lexer::tokenize(source) else {
        return source.to_string();
    };
    let mut edits = Vec::new();
    for stmt in module.walk_statements() {
        if let Stmt::FunctionDef(f) = stmt {
            if is_fixable(f) {
                if let Some(edit) = find_colon_insertion(&tokens, f) {
                    edits.push(edit);
                }
            }
        }
    }
    apply_edits_checked(source, edits)
}

fn is_fixable(f: &FunctionDef) -> bool {
    f.returns.is_none() && !crate::rules::is_dunder(&f.name) && !has_return_value(&f.body)
}

/// `true` if any `return <value>` appears in `body`, not descending into
/// nested function/class definitions. Narrower than the TYP002 rule's own
/// criterion (which flags every missing-annotation function): the fixer
/// only touches functions it can safely conclude return `None`, so every
/// function it rewrites is a subset of what the rule flags, never a
/// superset.
fn has_return_value(body: &[Stmt]) -> bool {
    for stmt in body {
        match stmt {
            Stmt::Return(r) if r.value.is_some() => return true,
            Stmt::FunctionDef(_) | Stmt::ClassDef(_) => continue,
            Stmt::If(i) => {
                if has_return_value(&i.body) || has_return_value(&i.orelse) {
                    return true;
                }
            }
            Stmt::Try(t) => {
                if has_return_value(&t.body)
                    || has_return_value(&t.orelse)
                    || has_return_value(&t.finalbody)
                    || t.handlers.iter().any(|h| has_return_value(&h.body))
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Find the `def NAME(` token pair on the function's header line, then the
/// first `:` at bracket depth zero after it.
fn find_colon_insertion(tokens: &[lexer::Token], f: &FunctionDef) -> Option<Edit> {
    let func_line = f.header_span.start.line;
    for i in 0..tokens.len() {
        let is_def = matches!(&tokens[i].kind, TokenKind::Name(n) if n == "def") && tokens[i].start.line == func_line;
        if is_def && i + 1 < tokens.len() && matches!(&tokens[i + 1].kind, TokenKind::Name(n) if *n == f.name) {
            return find_colon_after(tokens, i + 2);
        }
    }
    None
}

fn find_colon_after(tokens: &[lexer::Token], start: usize) -> Option<Edit> {
    let mut depth = 0i32;
    for tok in &tokens[start..] {
        match &tok.kind {
            TokenKind::Op("(") | TokenKind::Op("[") => depth += 1,
            TokenKind::Op(")") | TokenKind::Op("]") => depth -= 1,
            TokenKind::Op(":") if depth == 0 => {
                return Some(Edit::insert(tok.start.line, tok.start.column, " -> None"));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn adds_none_return_annotation() {
        let source = "def f(x: int):\n    print(x)\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_return_none(source, &parsed.module);
        assert_eq!(fixed, "def f(x: int) -> None:\n    print(x)\n");
    }

    #[test]
    fn leaves_value_returning_function_alone() {
        let source = "def f(x: int):\n    return x\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_return_none(source, &parsed.module);
        assert_eq!(fixed, source);
    }

    #[test]
    fn leaves_dunder_alone() {
        let source = "class C:\n    def __init__(self):\n        pass\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_missing_return_none(source, &parsed.module);
        assert_eq!(fixed, source);
    }
}
