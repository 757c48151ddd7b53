//! `pyguard lint`, grounded on `original_source/cli.py::lint`.

use pyguard_linter::config::{ColorMode, Configuration, ConfigurationTransformer, OutputFormat};
use pyguard_linter::runner::{format_results, lint_paths};

use crate::cli::{CliColorMode, CliOutputFormat, LintArgs};

/// Per-flag overrides collected from `lint`'s CLI arguments, applied on top
/// of the file-resolved [`Configuration`] via [`ConfigurationTransformer`].
struct LintOverrides {
    output_format: Option<CliOutputFormat>,
    color: Option<CliColorMode>,
    show_source: Option<bool>,
}

impl From<&LintArgs> for LintOverrides {
    fn from(args: &LintArgs) -> Self {
        Self {
            output_format: args.output_format,
            color: args.color,
            show_source: args.show_source_override(),
        }
    }
}

impl ConfigurationTransformer for LintOverrides {
    fn transform(&self, mut config: Configuration) -> Configuration {
        if let Some(format) = self.output_format {
            config.output_format = match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
            };
        }
        if let Some(color) = self.color {
            config.color = match color {
                CliColorMode::Auto => ColorMode::Auto,
                CliColorMode::Always => ColorMode::Always,
                CliColorMode::Never => ColorMode::Never,
            };
        }
        if let Some(show_source) = self.show_source {
            config.show_source = show_source;
        }
        config
    }
}

/// Runs the `lint` subcommand, returning the text to print and the process
/// exit code, mirroring `lint_paths`/`format_results`/`ctx.exit`.
pub fn run(args: &LintArgs, config: Configuration) -> anyhow::Result<(String, i32)> {
    let config = LintOverrides::from(args).transform(config);

    let paths = if args.paths.is_empty() {
        vec![std::path::PathBuf::from(".")]
    } else {
        args.paths.clone()
    };

    let result = lint_paths(&paths, &config)?;
    let output = format_results(&result, &config).map_err(anyhow::Error::msg)?;
    Ok((output, result.exit_code))
}
