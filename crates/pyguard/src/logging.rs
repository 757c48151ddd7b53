//! User-facing logging setup, grounded on `fortitude/src/logging.rs`.
//!
//! `log::warn!`/`log::info!` go through [`set_up_logging`]'s `fern`
//! dispatch; [`notify_user!`] bypasses it entirely for output that should
//! always print (a timestamped progress line), matching the original's
//! split between `logging.basicConfig` and bare `click.echo`.

use std::sync::{LazyLock, Mutex};

use anyhow::Result;
use colored::Colorize;
use log::Level;
use rustc_hash::FxHashSet;

pub static IDENTIFIERS: LazyLock<Mutex<Vec<&'static str>>> = LazyLock::new(Mutex::default);

/// Warn a user once, with uniqueness determined by the given ID.
#[macro_export]
macro_rules! warn_user_once_by_id {
    ($id:expr, $($arg:tt)*) => {{
        use colored::Colorize;
        use log::warn;

        if let Ok(mut seen) = $crate::logging::IDENTIFIERS.lock() {
            if !seen.contains(&$id) {
                let message = format!("{}", format_args!($($arg)*));
                warn!("{}", message.bold());
                seen.push($id);
            }
        }
    }};
}

pub static MESSAGES: LazyLock<Mutex<FxHashSet<String>>> = LazyLock::new(Mutex::default);

/// Warn a user once, with uniqueness determined by the content of the message.
#[macro_export]
macro_rules! warn_user_once_by_message {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use log::warn;

        if let Ok(mut seen) = $crate::logging::MESSAGES.lock() {
            let message = format!("{}", format_args!($($arg)*));
            if !seen.contains(&message) {
                warn!("{}", message.bold());
                seen.insert(message);
            }
        }
    }};
}

/// Warn a user once, with uniqueness determined by the call site itself.
#[macro_export]
macro_rules! warn_user_once {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use log::warn;

        static WARNED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        if !WARNED.swap(true, std::sync::atomic::Ordering::SeqCst) {
            let message = format!("{}", format_args!($($arg)*));
            warn!("{}", message.bold());
        }
    }};
}

#[macro_export]
macro_rules! warn_user {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use log::warn;

        let message = format!("{}", format_args!($($arg)*));
        warn!("{}", message.bold());
    }};
}

/// Always prints, timestamped, regardless of the configured [`LogLevel`].
#[macro_export]
macro_rules! notify_user {
    ($($arg:tt)*) => {
        println!(
            "[{}] {}",
            chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
            format_args!($($arg)*)
        )
    };
}

#[derive(Debug, Default, PartialOrd, Ord, PartialEq, Eq, Copy, Clone)]
pub enum LogLevel {
    /// No output at all.
    Silent,
    /// Only lint/fix results, no decorative log output.
    Quiet,
    /// All user-facing log output ([`log::LevelFilter::Info`]).
    #[default]
    Default,
    /// Everything, including debug traces ([`log::LevelFilter::Debug`]).
    Verbose,
}

impl LogLevel {
    const fn level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Default => log::LevelFilter::Info,
            LogLevel::Verbose => log::LevelFilter::Debug,
            LogLevel::Quiet | LogLevel::Silent => log::LevelFilter::Off,
        }
    }
}

pub fn set_up_logging(level: LogLevel) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| match record.level() {
            Level::Error => {
                out.finish(format_args!("{}{} {}", "error".red().bold(), ":".bold(), message));
            }
            Level::Warn => {
                out.finish(format_args!("{}{} {}", "warning".yellow().bold(), ":".bold(), message));
            }
            Level::Info | Level::Debug | Level::Trace => {
                out.finish(format_args!(
                    "{} [{}][{}] {}",
                    chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                    record.target(),
                    record.level(),
                    message
                ));
            }
        })
        .level(level.level_filter())
        .level_for("globset", log::LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::LogLevel;

    #[test]
    fn ordering() {
        assert!(LogLevel::Default > LogLevel::Silent);
        assert!(LogLevel::Default >= LogLevel::Default);
        assert!(LogLevel::Quiet > LogLevel::Silent);
        assert!(LogLevel::Verbose > LogLevel::Default);
        assert!(LogLevel::Verbose > LogLevel::Silent);
    }
}
