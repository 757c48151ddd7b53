//! `pyguard fix`, grounded on `original_source/cli.py::fix`.

use pyguard_linter::config::Configuration;
use pyguard_linter::runner::{fix_paths, format_diff};

use crate::cli::FixArgs;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Runs the `fix` subcommand. Diff and check-only modes never touch disk;
/// the default mode writes every changed file in place.
pub fn run(args: &FixArgs, config: &Configuration) -> anyhow::Result<(String, i32)> {
    let paths = if args.paths.is_empty() {
        vec![std::path::PathBuf::from(".")]
    } else {
        args.paths.clone()
    };

    let result = fix_paths(&paths, config)?;

    if args.show_diff {
        let mut lines = Vec::new();
        let mut changed: Vec<_> = result.changes.iter().collect();
        changed.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (path, (old, new)) in changed {
            lines.push(format_diff(path, old, new));
        }
        lines.push(format!(
            "{} file{} would be changed.",
            result.files_changed,
            plural(result.files_changed)
        ));
        return Ok((lines.join(""), 0));
    }

    if args.check_only {
        if result.files_changed > 0 {
            return Ok((
                format!("{} file{} would be changed.", result.files_changed, plural(result.files_changed)),
                1,
            ));
        }
        return Ok(("No changes needed.".to_string(), 0));
    }

    for (path, (_, new)) in &result.changes {
        std::fs::write(path, new)?;
    }

    Ok((
        format!("Fixed {} file{}.", result.files_changed, plural(result.files_changed)),
        0,
    ))
}
