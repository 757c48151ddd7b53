//! IMP001 fixer: move function-level imports to module level. Grounded on
//! `original_source/fixers/imp001.py`.
//!
//! Only handles simple, single-line imports and skips conditional imports
//! (`TYPE_CHECKING` guards, `try`/`except ImportError`), exactly like the
//! rule itself.

use std::collections::HashSet;

use crate::ast::{Expr, If, Module, Stmt, Try};
use crate::parser::parse;
use crate::position::SourceSpan;

/// A representative sample of the standard library, standing in for
/// `sys.stdlib_module_names` (not available outside the interpreter this
/// was ported from) -- used only to decide where newly hoisted imports are
/// inserted relative to third-party ones.
const STDLIB_MODULES: &[&str] = &[
    "os", "sys", "re", "io", "json", "math", "time", "enum", "abc", "copy", "glob", "uuid",
    "collections", "itertools", "functools", "pathlib", "typing", "dataclasses", "logging",
    "datetime", "random", "subprocess", "threading", "asyncio", "contextlib", "traceback",
    "pickle", "socket", "shutil", "tempfile", "unittest", "argparse", "inspect", "importlib",
    "warnings", "hashlib", "base64", "string", "textwrap", "shlex", "csv", "configparser",
    "sqlite3", "xml", "http", "urllib", "email", "statistics", "weakref", "struct", "platform",
];

pub fn fix_local_imports(source: &str, module: &Module) -> String {
    let mut local_spans = Vec::new();
    let mut module_spans = Vec::new();
    collect(&module.body, 0, false, &mut local_spans, &mut module_spans);
    if local_spans.is_empty() {
        return source.to_string();
    }

    let mut lines: Vec<String> = split_keepends(source);

    let module_texts: HashSet<String> = module_spans
        .iter()
        .filter_map(|span| lines.get((span.start.line as usize).checked_sub(1)?))
        .map(|line| line.trim().to_string())
        .collect();

    let mut lines_to_remove = HashSet::new();
    let mut new_import_texts: Vec<String> = Vec::new();
    for span in &local_spans {
        if span.end.is_some_and(|e| e.line != span.start.line) {
            continue;
        }
        let Some(idx) = (span.start.line as usize).checked_sub(1) else { continue };
        let Some(line) = lines.get(idx) else { continue };
        lines_to_remove.insert(idx);
        let text = line.trim().to_string();
        if !module_texts.contains(&text) && !new_import_texts.contains(&text) {
            new_import_texts.push(text);
        }
    }
    if lines_to_remove.is_empty() {
        return source.to_string();
    }

    let mut kept: Vec<String> = lines
        .drain(..)
        .enumerate()
        .filter(|(idx, _)| !lines_to_remove.contains(idx))
        .map(|(_, line)| line)
        .collect();

    if new_import_texts.is_empty() {
        return finish(kept.join(""), source);
    }

    let (stdlib, other): (Vec<String>, Vec<String>) =
        new_import_texts.into_iter().partition(|t| is_stdlib_import(t));

    let mut block: Vec<String> = Vec::new();
    for imp in &stdlib {
        block.push(format!("{imp}\n"));
    }
    if !stdlib.is_empty() && !other.is_empty() {
        block.push("\n".to_string());
    }
    for imp in &other {
        block.push(format!("{imp}\n"));
    }

    let insert_pos = if stdlib.is_empty() { after_last_import(&kept) } else { 0 };
    if insert_pos < kept.len() && !kept[insert_pos].trim().is_empty() {
        block.push("\n".to_string());
    }
    for (offset, line) in block.into_iter().enumerate() {
        kept.insert(insert_pos + offset, line);
    }

    finish(kept.join(""), source)
}

fn finish(result: String, source: &str) -> String {
    if parse(&result).is_err() {
        source.to_string()
    } else {
        result
    }
}

fn after_last_import(lines: &[String]) -> usize {
    let mut last = None;
    for (idx, line) in lines.iter().enumerate() {
        let stripped = line.trim_start();
        if stripped.starts_with("import ") || stripped.starts_with("from ") {
            last = Some(idx);
        }
    }
    last.map_or(0, |idx| idx + 1)
}

fn is_stdlib_import(text: &str) -> bool {
    let module = if let Some(rest) = text.strip_prefix("from ") {
        rest.split_whitespace().next().unwrap_or("")
    } else if let Some(rest) = text.strip_prefix("import ") {
        rest.split_whitespace().next().unwrap_or("").trim_end_matches(',')
    } else {
        return false;
    };
    let top_level = module.split('.').next().unwrap_or("");
    STDLIB_MODULES.contains(&top_level)
}

fn collect(
    body: &[Stmt],
    depth: u32,
    guarded: bool,
    local: &mut Vec<SourceSpan>,
    module_level: &mut Vec<SourceSpan>,
) {
    for stmt in body {
        match stmt {
            Stmt::Import(imp) if depth > 0 && !guarded => local.push(imp.span),
            Stmt::ImportFrom(imp) if depth > 0 && !guarded => local.push(imp.span),
            Stmt::Import(imp) if !guarded => module_level.push(imp.span),
            Stmt::ImportFrom(imp) if !guarded => module_level.push(imp.span),
            Stmt::Import(_) | Stmt::ImportFrom(_) => {}
            Stmt::FunctionDef(f) => collect(&f.body, depth + 1, false, local, module_level),
            Stmt::ClassDef(c) => collect(&c.body, depth, guarded, local, module_level),
            Stmt::If(i) => collect_if(i, depth, guarded, local, module_level),
            Stmt::Try(t) => collect_try(t, depth, guarded, local, module_level),
            _ => {}
        }
    }
}

fn collect_if(stmt: &If, depth: u32, guarded: bool, local: &mut Vec<SourceSpan>, module_level: &mut Vec<SourceSpan>) {
    let body_guarded = guarded || is_type_checking(&stmt.test);
    collect(&stmt.body, depth, body_guarded, local, module_level);
    collect(&stmt.orelse, depth, guarded, local, module_level);
}

fn collect_try(stmt: &Try, depth: u32, guarded: bool, local: &mut Vec<SourceSpan>, module_level: &mut Vec<SourceSpan>) {
    let catches_import_error = stmt.handlers.iter().any(|h| h.kind.as_ref().map_or(true, is_import_error));
    let inner_guarded = guarded || catches_import_error;
    collect(&stmt.body, depth, inner_guarded, local, module_level);
    collect(&stmt.orelse, depth, inner_guarded, local, module_level);
    collect(&stmt.finalbody, depth, inner_guarded, local, module_level);
    for handler in &stmt.handlers {
        collect(&handler.body, depth, inner_guarded, local, module_level);
    }
}

fn is_type_checking(expr: &Expr) -> bool {
    expr.dotted_name().is_some_and(|name| name == "TYPE_CHECKING" || name.ends_with(".TYPE_CHECKING"))
}

fn is_import_error(expr: &Expr) -> bool {
    match expr {
        Expr::Tuple(t) => t.elts.iter().any(is_import_error),
        _ => expr.dotted_name().is_some_and(|name| {
            matches!(name.rsplit('.').next(), Some("ImportError" | "ModuleNotFoundError"))
        }),
    }
}

fn split_keepends(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for c in source.chars() {
        current.push(c);
        if c == '\n' {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn hoists_unguarded_local_import_to_module_level() {
        let source = "def f():\n    import json\n    return json.dumps({})\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_local_imports(source, &parsed.module);
        assert_eq!(fixed, "import json\n\ndef f():\n    return json.dumps({})\n");
    }

    #[test]
    fn leaves_guarded_import_alone() {
        let source = "def f():\n    try:\n        import simplejson as json\n    except ImportError:\n        import json\n    return json\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_local_imports(source, &parsed.module);
        assert_eq!(fixed, source);
    }

    #[test]
    fn deduplicates_against_existing_module_level_import() {
        let source = "import json\n\ndef f():\n    import json\n    return json.dumps({})\n";
        let parsed = parse(source).unwrap();
        let fixed = fix_local_imports(source, &parsed.module);
        assert_eq!(fixed, "import json\n\ndef f():\n    return json.dumps({})\n");
    }
}
