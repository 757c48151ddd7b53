use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use pyguard::cli::{Cli, SubCommands};
use pyguard::commands::{config as config_cmd, explain as explain_cmd, fix as fix_cmd, lint as lint_cmd, load_config};
use pyguard::logging::set_up_logging;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{} {err}", "pyguard failed:".red().bold()).ok();
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    set_up_logging(cli.global.log_level())?;

    let config = match load_config(cli.global.config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::from(1));
        }
    };

    let (output, exit_code) = match cli.command {
        SubCommands::Config(args) => (config_cmd::run(&args, &config), 0),
        SubCommands::Lint(args) => lint_cmd::run(&args, config)?,
        SubCommands::Fix(args) => fix_cmd::run(&args, &config)?,
        SubCommands::Explain(args) => explain_cmd::run(&args, &config),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(ExitCode::from(u8::try_from(exit_code).unwrap_or(255)))
}
