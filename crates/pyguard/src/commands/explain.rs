//! `pyguard explain`, grounded on `original_source/cli.py::explain`.

use pyguard_linter::config::Configuration;
use pyguard_linter::explain::{format_rule_detail, format_rule_table, lookup};
use pyguard_linter::registry::RuleCode;

use crate::cli::ExplainArgs;

/// Returns the text to print and the exit code, mirroring the Click
/// command's `click.echo`/`ctx.exit` pairs.
pub fn run(args: &ExplainArgs, config: &Configuration) -> (String, i32) {
    if args.show_all {
        return (format_rule_table(config), 0);
    }

    let Some(rule_code) = &args.rule_code else {
        return ("Usage: pyguard explain <RULE_CODE> or pyguard explain --all".to_string(), 1);
    };

    let code = rule_code.to_uppercase();
    let Some(code) = RuleCode::from_code(&code) else {
        return (format!("Error: Unknown rule code '{code}'."), 1);
    };

    let default_severity = *Configuration::default()
        .rules
        .severities
        .get(&code)
        .expect("every RuleCode has a default severity");

    (format_rule_detail(lookup(code), default_severity), 0)
}
