//! Command-line surface, grounded on `original_source/cli.py`'s Click
//! group (`config`/`lint`/`fix`/`explain` subcommands with `--config`/
//! `--verbose`/`--debug` globals), expressed as a `clap` derive the way
//! `fortitude/src/cli.rs` structures its own `Cli`/`SubCommands` split.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogLevel;

#[derive(Debug, Parser)]
#[command(
    name = "pyguard",
    author,
    version,
    about = "PyGuard - A strict Python linter for typing, APIs, and structured returns."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every subcommand, matching the Click group's own
/// `--config`/`--verbose`/`--debug` options.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct GlobalArgs {
    /// Path to pyproject.toml (default: search upward from the current directory).
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Show progress and timing.
    #[arg(long, group = "verbosity")]
    pub verbose: bool,

    /// Show detailed trace-level output.
    #[arg(long, group = "verbosity")]
    pub debug: bool,

    /// Show only lint violations, no decorative output.
    #[arg(long, group = "verbosity")]
    pub quiet: bool,

    /// Disable all log output.
    #[arg(long, group = "verbosity")]
    pub silent: bool,
}

impl GlobalArgs {
    pub fn log_level(&self) -> LogLevel {
        if self.silent {
            LogLevel::Silent
        } else if self.quiet {
            LogLevel::Quiet
        } else if self.debug {
            LogLevel::Verbose
        } else if self.verbose {
            LogLevel::Default
        } else {
            LogLevel::Quiet
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    /// Show or validate the resolved configuration.
    Config(ConfigArgs),
    /// Run linting on Python files.
    Lint(LintArgs),
    /// Apply safe autofixes to Python files.
    Fix(FixArgs),
    /// Show rule documentation and examples.
    Explain(ExplainArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Only validate configuration, don't print it.
    #[arg(long)]
    pub validate: bool,

    /// Output the configuration as JSON.
    #[arg(long = "json")]
    pub as_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CliColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LintArgs {
    /// Files or directories to check. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Output format for violations (overrides config).
    #[arg(long = "format", value_enum)]
    pub output_format: Option<CliOutputFormat>,

    /// Color output mode (overrides config).
    #[arg(long, value_enum)]
    pub color: Option<CliColorMode>,

    /// Show source code snippets (overrides config).
    #[arg(long, overrides_with("no_show_source"), action = clap::ArgAction::SetTrue)]
    pub show_source: bool,
    #[arg(long, overrides_with("show_source"), hide = true, action = clap::ArgAction::SetTrue)]
    pub no_show_source: bool,
}

impl LintArgs {
    pub fn show_source_override(&self) -> Option<bool> {
        if self.show_source {
            Some(true)
        } else if self.no_show_source {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct FixArgs {
    /// Files or directories to fix. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Print a unified diff instead of writing files.
    #[arg(long = "diff")]
    pub show_diff: bool,

    /// Exit 1 if any file would change, without writing anything.
    #[arg(long = "check")]
    pub check_only: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ExplainArgs {
    /// Rule code to explain, e.g. `TYP001`.
    pub rule_code: Option<String>,

    /// List every rule with a one-line summary.
    #[arg(long = "all")]
    pub show_all: bool,
}
