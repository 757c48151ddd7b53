//! Subcommand implementations (C9, CLI surface). Each mirrors the
//! corresponding function in `original_source/cli.py`.

pub mod config;
pub mod explain;
pub mod fix;
pub mod lint;

use std::path::Path;

use pyguard_linter::config::{Configuration, ConfigError};

/// Resolves configuration the way `ConfigLoader.load` does: an explicit
/// path if given, otherwise a `pyproject.toml` found by walking up from the
/// current directory, otherwise the defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Configuration, ConfigError> {
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
            Configuration::find_config_file(&cwd)
        }
    };

    match path {
        Some(path) => Configuration::load(&path),
        None => Ok(Configuration::default()),
    }
}
