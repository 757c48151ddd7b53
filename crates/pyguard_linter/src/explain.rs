//! Rule documentation catalog for the `explain` CLI command (C9). Grounded
//! on `original_source/explain.py`.

use crate::registry::RuleCode;

#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    pub code: RuleCode,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub bad_example: &'static str,
    pub good_example: &'static str,
    pub has_autofix: bool,
    pub fix_description: &'static str,
    pub config_options: &'static str,
}

pub const RULE_CATALOG: &[RuleInfo] = &[
    RuleInfo {
        code: RuleCode::Typ001,
        name: "Missing Parameter Annotations",
        category: "typing",
        description: "All function parameters must have type annotations.\nThis makes function signatures self-documenting and enables\nstatic type checking.",
        bad_example: "def greet(name): ...",
        good_example: "def greet(name: str) -> None: ...",
        has_autofix: false,
        fix_description: "",
        config_options: "[tool.pyguard.rules.TYP001]\nexempt_dunder = true    # Skip __init__, __str__, etc.\nexempt_self_cls = true  # Skip self/cls parameters",
    },
    RuleInfo {
        code: RuleCode::Typ002,
        name: "Missing Return Annotation",
        category: "typing",
        description: "All functions must have a return type annotation.\nExplicit return types document the function contract and\ncatch accidental return value changes.",
        bad_example: "def greet(name: str): ...",
        good_example: "def greet(name: str) -> None: ...",
        has_autofix: true,
        fix_description: "Adds -> None to functions that lack a return annotation.",
        config_options: "",
    },
    RuleInfo {
        code: RuleCode::Typ003,
        name: "Missing Variable Annotation",
        category: "typing",
        description: "Variables should have type annotations, especially at module\nand class scope. This aids readability and enables type checkers\nto verify assignments.",
        bad_example: "MAX_RETRIES = 3",
        good_example: "MAX_RETRIES: int = 3",
        has_autofix: true,
        fix_description: "Infers type from the assigned value and adds annotation.",
        config_options: "[tool.pyguard.rules.TYP003]\nscope = [\"module\"]  # \"module\", \"class\", \"local\"",
    },
    RuleInfo {
        code: RuleCode::Typ010,
        name: "Legacy Typing Syntax",
        category: "typing",
        description: "Use modern typing syntax (PEP 585/604) instead of legacy\ntyping module generics: list[str] instead of List[str], X | None\ninstead of Optional[X].",
        bad_example: "from typing import List, Optional\ndef f(x: Optional[List[str]]): ...",
        good_example: "def f(x: list[str] | None) -> None: ...",
        has_autofix: true,
        fix_description: "Rewrites legacy typing aliases to modern equivalents and drops now-unused imports.",
        config_options: "",
    },
    RuleInfo {
        code: RuleCode::Kw001,
        name: "Missing Keyword-Only Parameters",
        category: "api",
        description: "Functions with multiple parameters should use keyword-only\narguments (after *) to prevent positional call-site errors\nand make APIs self-documenting.",
        bad_example: "def connect(host: str, port: int, timeout: float): ...",
        good_example: "def connect(*, host: str, port: int, timeout: float): ...",
        has_autofix: true,
        fix_description: "Inserts a * separator before parameters that should be keyword-only.",
        config_options: "[tool.pyguard.rules.KW001]\nmin_params = 2          # Minimum params to trigger\nexempt_dunder = true    # Skip __init__, etc.\nexempt_private = true   # Skip _private methods\nexempt_overrides = true # Skip methods with @override",
    },
    RuleInfo {
        code: RuleCode::Ret001,
        name: "Heterogeneous Tuple Returns",
        category: "api",
        description: "Functions should not return heterogeneous tuples like\n`return name, age, active`. Use a dataclass or NamedTuple\ninstead for clarity and type safety.",
        bad_example: "def get_user() -> tuple[str, int]:\n    return name, age",
        good_example: "@dataclass\nclass User:\n    name: str\n    age: int",
        has_autofix: false,
        fix_description: "",
        config_options: "",
    },
    RuleInfo {
        code: RuleCode::Imp001,
        name: "In-Function Imports",
        category: "imports",
        description: "All imports should be at module level, not inside functions.\nModule-level imports make dependencies visible, improve\nstartup predictability, and enable static analysis.",
        bad_example: "def process():\n    import json\n    return json.dumps({})",
        good_example: "import json\n\ndef process():\n    return json.dumps({})",
        has_autofix: true,
        fix_description: "Moves unguarded in-function imports to the top of the module.",
        config_options: "",
    },
    RuleInfo {
        code: RuleCode::Exp001,
        name: "Module-Level Return Types",
        category: "exports",
        description: "Structured return types used in public function signatures\nshould be defined at module level so they are importable by\ncallers, not buried inside the function that returns them.",
        bad_example: "def get_user():\n    class User: ...\n    return User()",
        good_example: "class User: ...\n\ndef get_user() -> User: ...",
        has_autofix: false,
        fix_description: "",
        config_options: "",
    },
    RuleInfo {
        code: RuleCode::Exp002,
        name: "Missing __all__ Declaration",
        category: "exports",
        description: "Modules with public symbols should declare __all__ to make\nthe public API explicit. This helps IDE autocompletion,\ndocumentation generators, and wildcard imports.",
        bad_example: "# module.py\ndef public_func(): ...\ndef _private(): ...",
        good_example: "__all__ = [\"public_func\"]\n\ndef public_func(): ...",
        has_autofix: false,
        fix_description: "",
        config_options: "",
    },
];

pub fn lookup(code: RuleCode) -> &'static RuleInfo {
    RULE_CATALOG
        .iter()
        .find(|info| info.code == code)
        .expect("every RuleCode has a catalog entry")
}

pub fn format_rule_detail(info: &RuleInfo, default_severity: crate::registry::ConfigSeverity) -> String {
    let severity_name = match default_severity {
        crate::registry::ConfigSeverity::Error => "error",
        crate::registry::ConfigSeverity::Warn => "warn",
        crate::registry::ConfigSeverity::Off => "off",
    };
    let mut lines = vec![
        format!("{}: {}", info.code.as_code(), info.name),
        format!(
            "Category: {} | Default severity: {} | Autofix: {}",
            info.category,
            severity_name,
            if info.has_autofix { "Yes" } else { "No" }
        ),
        String::new(),
    ];
    for line in info.description.lines() {
        lines.push(format!("  {line}"));
    }
    lines.push(String::new());
    lines.push(format!("  Bad:   {}", info.bad_example.lines().next().unwrap_or_default()));
    lines.push(format!("  Good:  {}", info.good_example.lines().next().unwrap_or_default()));

    if !info.fix_description.is_empty() {
        lines.push(String::new());
        lines.push(format!("  Fix: {}", info.fix_description));
    }
    if !info.config_options.is_empty() {
        let mut config_lines = info.config_options.lines();
        if let Some(first) = config_lines.next() {
            lines.push(String::new());
            lines.push(format!("  Config: {first}"));
        }
        for rest in config_lines {
            lines.push(format!("          {rest}"));
        }
    }
    lines.push(String::new());
    lines.push(format!("  Suppress: # pyguard: ignore[{}] because: <reason>", info.code.as_code()));
    lines.join("\n")
}

pub fn format_rule_table(config: &crate::config::Configuration) -> String {
    let mut sorted: Vec<&RuleInfo> = RULE_CATALOG.iter().collect();
    sorted.sort_by_key(|info| info.code.as_code());
    let mut lines = vec![
        format!("{:<8} {:<10} {:<35} {:<4}", "CODE", "SEVERITY", "NAME", "FIX"),
        "-".repeat(60),
    ];
    for info in sorted {
        let severity = config
            .rules
            .severities
            .get(&info.code)
            .map_or("off".to_string(), |s| match s {
                crate::registry::ConfigSeverity::Error => "error".to_string(),
                crate::registry::ConfigSeverity::Warn => "warn".to_string(),
                crate::registry::ConfigSeverity::Off => "off".to_string(),
            });
        let fix_marker = if info.has_autofix { "Yes" } else { "-" };
        lines.push(format!(
            "{:<8} {:<10} {:<35} {:<4}",
            info.code.as_code(),
            severity,
            info.name,
            fix_marker
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_code_has_a_catalog_entry() {
        for code in RuleCode::all() {
            assert_eq!(lookup(*code).code, *code);
        }
    }

    #[test]
    fn detail_includes_suppress_hint() {
        let info = lookup(RuleCode::Kw001);
        let detail = format_rule_detail(info, crate::registry::ConfigSeverity::Warn);
        assert!(detail.contains("Suppress: # pyguard: ignore[KW001]"));
    }

    #[test]
    fn table_lists_every_rule_sorted_by_code() {
        let table = format_rule_table(&crate::config::Configuration::default());
        let exp_idx = table.find("EXP001").unwrap();
        let imp_idx = table.find("IMP001").unwrap();
        assert!(imp_idx < exp_idx);
    }
}
