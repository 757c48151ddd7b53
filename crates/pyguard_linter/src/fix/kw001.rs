//! KW001 fixer (phase 1 only): insert a bare `*` separator into function
//! signatures identified by the KW001 rule. Grounded on
//! `original_source/fixers/kw001.py`; rewriting call sites (the original's
//! "phase 2, not yet implemented") is out of scope here too.

use crate::ast::{FunctionDef, Module, Stmt};
use crate::config::Kw001Options;
use crate::lexer::{self, TokenKind};
use crate::rules::kw001::has_override_decorator;

use super::edits::{apply_edits_checked, Edit};

pub fn fix_keyword_only(source: &str, module: &Module, opts: &Kw001Options) -> String {
    let Ok(tokens) = lexer::tokenize(source) else {
        return source.to_string();
    };
    let mut edits = Vec::new();
    visit(&module.body, false, opts, &tokens, &mut edits);
    apply_edits_checked(source, edits)
}

fn visit(body: &[Stmt], in_class: bool, opts: &Kw001Options, tokens: &[lexer::Token], edits: &mut Vec<Edit>) {
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(f) => {
                if is_fixable(f, in_class, opts) {
                    if let Some(edit) = find_star_insertion(tokens, f) {
                        edits.push(edit);
                    }
                }
                visit(&f.body, false, opts, tokens, edits);
            }
            Stmt::ClassDef(c) => visit(&c.body, true, opts, tokens, edits),
            Stmt::If(i) => {
                visit(&i.body, in_class, opts, tokens, edits);
                visit(&i.orelse, in_class, opts, tokens, edits);
            }
            Stmt::Try(t) => {
                visit(&t.body, in_class, opts, tokens, edits);
                visit(&t.orelse, in_class, opts, tokens, edits);
                visit(&t.finalbody, in_class, opts, tokens, edits);
                for handler in &t.handlers {
                    visit(&handler.body, in_class, opts, tokens, edits);
                }
            }
            _ => {}
        }
    }
}

fn is_fixable(f: &FunctionDef, in_class: bool, opts: &Kw001Options) -> bool {
    if opts.exempt_dunder && crate::rules::is_dunder(&f.name) {
        return false;
    }
    if opts.exempt_private && crate::rules::is_private(&f.name) {
        return false;
    }
    if opts.exempt_overrides && has_override_decorator(&f.decorators) {
        return false;
    }
    if f.args.has_star_separator || f.args.vararg.is_some() || !f.args.kwonlyargs.is_empty() {
        return false;
    }
    let positional_count = f.args.positional_params().count();
    let offset = if in_class && positional_count > 0 { 1 } else { 0 };
    positional_count.saturating_sub(offset) >= opts.min_params
}

fn find_star_insertion(tokens: &[lexer::Token], f: &FunctionDef) -> Option<Edit> {
    let func_line = f.header_span.start.line;
    let paren_idx = find_def_open_paren(tokens, func_line, &f.name)?;
    let has_self_cls = f
        .args
        .args
        .first()
        .is_some_and(|a| matches!(a.name.as_str(), "self" | "cls"));
    if has_self_cls {
        insert_after_first_param(tokens, paren_idx)
    } else {
        insert_after_open_paren(tokens, paren_idx)
    }
}

fn find_def_open_paren(tokens: &[lexer::Token], func_line: u32, name: &str) -> Option<usize> {
    for i in 0..tokens.len() {
        let is_def = matches!(&tokens[i].kind, TokenKind::Name(n) if n == "def") && tokens[i].start.line == func_line;
        if is_def && i + 1 < tokens.len() && matches!(&tokens[i + 1].kind, TokenKind::Name(n) if n == name) {
            for j in i + 2..tokens.len() {
                if matches!(tokens[j].kind, TokenKind::Op("(")) {
                    return Some(j);
                }
            }
        }
    }
    None
}

fn insert_after_open_paren(tokens: &[lexer::Token], paren_idx: usize) -> Option<Edit> {
    let paren = &tokens[paren_idx];
    Some(Edit::insert(paren.end.line, paren.end.column, "*, "))
}

/// Insert `*, ` right after the comma following the first parameter
/// (`self`/`cls`), matching the Python fixer's whitespace handling: if the
/// next token already starts with its own leading space on the same line,
/// insert flush after the comma; otherwise add a leading space too.
fn insert_after_first_param(tokens: &[lexer::Token], paren_idx: usize) -> Option<Edit> {
    let mut depth = 0i32;
    for idx in paren_idx..tokens.len() {
        match &tokens[idx].kind {
            TokenKind::Op("(") => depth += 1,
            TokenKind::Op(")") => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Op(",") if depth == 1 => {
                let comma = &tokens[idx];
                let next = tokens.get(idx + 1);
                let has_space_after = next.is_some_and(|t| {
                    t.start.line == comma.end.line && t.start.column > comma.end.column
                });
                return Some(if has_space_after {
                    Edit::insert(comma.end.line, comma.end.column + 1, "*, ")
                } else {
                    Edit::insert(comma.end.line, comma.end.column, " *, ")
                });
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
    fn inserts_star_after_self() {
        let source = "class C:\n    def compute(self, a: int, b: int, op: str) -> int:\n        return a\n";
        let parsed = parse(source).unwrap();
        let config = Configuration::default();
        let fixed = fix_keyword_only(source, &parsed.module, &config.rules.kw001);
        assert!(fixed.contains("def compute(self, *, a: int, b: int, op: str) -> int:"));
    }

    #[test]
    fn inserts_star_at_open_paren_for_free_function() {
        let source = "def compute(a: int, b: int, op: str) -> int:\n    return a\n";
        let parsed = parse(source).unwrap();
        let config = Configuration::default();
        let fixed = fix_keyword_only(source, &parsed.module, &config.rules.kw001);
        assert!(fixed.contains("def compute(*, a: int, b: int, op: str) -> int:"));
    }

    #[test]
    fn leaves_exempt_function_alone() {
        let source = "class C:\n    def __init__(self, a, b, c):\n        pass\n";
        let parsed = parse(source).unwrap();
        let config = Configuration::default();
        let fixed = fix_keyword_only(source, &parsed.module, &config.rules.kw001);
        assert_eq!(fixed, source);
    }
}
