//! `pyguard config`, grounded on `original_source/cli.py`'s
//! `format_config_text`/`format_config_json` and the `config` command.

use pyguard_linter::config::Configuration;

use crate::cli::ConfigArgs;

pub fn format_config_text(config: &Configuration) -> String {
    let mut severities: Vec<_> = config.rules.severities.iter().collect();
    severities.sort_by_key(|(code, _)| code.as_code());

    let exclude_preview: Vec<&str> = config.exclude.iter().take(5).map(String::as_str).collect();
    let ellipsis = if config.exclude.len() > 5 { "..." } else { "" };

    let mut disallow: Vec<&str> = config.ignores.disallow.iter().map(|c| c.as_code()).collect();
    disallow.sort_unstable();
    let disallow_display = if disallow.is_empty() {
        "(none)".to_string()
    } else {
        format!("[{}]", disallow.join(", "))
    };

    let max_display = config
        .ignores
        .max_per_file
        .map_or_else(|| "unlimited".to_string(), |n| n.to_string());

    let mut lines = vec![
        "PyGuard Configuration".to_string(),
        "=".repeat(40),
        String::new(),
        format!(
            "Config file: {}",
            config
                .config_path
                .as_ref()
                .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string())
        ),
        format!("Python version: {}", config.python_version.as_deref().unwrap_or("3.11")),
        String::new(),
        "File Discovery:".to_string(),
        format!("  Include: {}", config.include.join(", ")),
        format!("  Exclude: {}{ellipsis}", exclude_preview.join(", ")),
        String::new(),
        "Output:".to_string(),
        format!("  Format: {:?}", config.output_format).to_lowercase(),
        format!("  Color: {:?}", config.color).to_lowercase(),
        format!("  Show source: {}", config.show_source),
        String::new(),
        "Rule Severities:".to_string(),
    ];

    for (code, severity) in severities {
        lines.push(format!("  {}: {}", code.as_code(), format!("{severity:?}").to_uppercase()));
    }

    lines.extend([
        String::new(),
        "Ignore Governance:".to_string(),
        format!("  Require reason: {}", config.ignores.require_reason),
        format!("  Disallow: {disallow_display}"),
        format!("  Max per file: {max_display}"),
    ]);

    lines.join("\n")
}

pub fn format_config_json(config: &Configuration) -> String {
    let severities: serde_json::Map<String, serde_json::Value> = config
        .rules
        .severities
        .iter()
        .map(|(code, severity)| (code.as_code().to_string(), severity_name(*severity).into()))
        .collect();

    let mut disallow: Vec<&str> = config.ignores.disallow.iter().map(|c| c.as_code()).collect();
    disallow.sort_unstable();

    let data = serde_json::json!({
        "config_path": config.config_path.as_ref().map(|p| p.display().to_string()),
        "python_version": config.python_version,
        "include": config.include,
        "exclude": config.exclude,
        "output_format": format!("{:?}", config.output_format).to_lowercase(),
        "show_source": config.show_source,
        "color": format!("{:?}", config.color).to_lowercase(),
        "rules": {
            "severities": severities,
            "TYP001": {
                "exempt_dunder": config.rules.typ001.exempt_dunder,
                "exempt_self_cls": config.rules.typ001.exempt_self_cls,
            },
            "KW001": {
                "min_params": config.rules.kw001.min_params,
                "exempt_dunder": config.rules.kw001.exempt_dunder,
                "exempt_private": config.rules.kw001.exempt_private,
                "exempt_overrides": config.rules.kw001.exempt_overrides,
            },
        },
        "ignores": {
            "require_reason": config.ignores.require_reason,
            "disallow": disallow,
            "max_per_file": config.ignores.max_per_file,
        },
    });
    serde_json::to_string_pretty(&data).expect("configuration JSON is always serializable")
}

fn severity_name(severity: pyguard_linter::registry::ConfigSeverity) -> &'static str {
    use pyguard_linter::registry::ConfigSeverity::{Error, Off, Warn};
    match severity {
        Error => "error",
        Warn => "warn",
        Off => "off",
    }
}

pub fn run(args: &ConfigArgs, config: &Configuration) -> String {
    if args.validate {
        return format!(
            "Configuration valid: {}",
            config
                .config_path
                .as_ref()
                .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string())
        );
    }
    if args.as_json {
        format_config_json(config)
    } else {
        format_config_text(config)
    }
}
