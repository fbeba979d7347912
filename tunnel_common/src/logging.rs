//! Logging setup driven by the `log` destination and `log-level` settings.
//!
//! Destinations `"none"` and `"stdout"` are special; anything else is a file
//! path that log lines are appended to.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use strum_macros::{Display, EnumString};

use crate::error::ConfigError;
use crate::result::Result;

/// Destination value that disables logging.
pub const LOG_NONE: &str = "none";
/// Destination value that logs to standard output.
pub const LOG_STDOUT: &str = "stdout";

/// Minimum severity emitted.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Display, EnumString, Eq, PartialEq)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[strum(to_string = "WARNING", serialize = "WARN")]
    Warning,
    #[strum(to_string = "ERROR", serialize = "CRITICAL")]
    Error,
}

impl LogLevel {
    /// Parse a level string, reporting the rejected value on failure.
    pub fn parse(level: &str) -> Result<Self> {
        LogLevel::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LogDestination {
    /// Logging disabled.
    Discard,
    /// Standard output.
    Stdout,
    /// Appended to a file.
    File(PathBuf),
}

impl From<&str> for LogDestination {
    fn from(log_to: &str) -> Self {
        match log_to {
            LOG_NONE => LogDestination::Discard,
            LOG_STDOUT => LogDestination::Stdout,
            path => LogDestination::File(PathBuf::from(path)),
        }
    }
}

/// Build an `env_logger` for the given destination and level without installing it.
pub fn build_logger(log_to: &str, log_level: &str) -> Result<env_logger::Builder> {
    let level = LogLevel::parse(log_level)?;
    let mut builder = env_logger::Builder::new();

    match LogDestination::from(log_to) {
        LogDestination::Discard => {
            builder.filter_level(LevelFilter::Off);
            return Ok(builder);
        }
        LogDestination::Stdout => {
            builder.target(env_logger::Target::Stdout);
        }
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| ConfigError::OpenLog { path: path.clone(), source })?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }

    builder.filter_level(level.into()).parse_default_env();
    Ok(builder)
}

/// Install the process-wide logger for the given destination and level.
pub fn init_logger(log_to: &str, log_level: &str) -> Result<()> {
    build_logger(log_to, log_level)?.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("WARNING").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::parse("warn").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::parse("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::parse("Critical").unwrap(), LogLevel::Error);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = LogLevel::parse("LOUD").unwrap_err();
        assert_eq!(err.to_string(), "Invalid log level: LOUD");
    }

    #[test]
    fn maps_levels_to_filters() {
        assert_eq!(LevelFilter::from(LogLevel::Warning), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::Info);
    }

    #[test]
    fn special_destinations() {
        assert_eq!(LogDestination::from("none"), LogDestination::Discard);
        assert_eq!(LogDestination::from("stdout"), LogDestination::Stdout);
        assert_eq!(
            LogDestination::from("/var/log/tunnel.log"),
            LogDestination::File(PathBuf::from("/var/log/tunnel.log"))
        );
    }

    #[test]
    fn file_destination_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tunnel.log");
        build_logger(path.to_str().unwrap(), "INFO").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unopenable_log_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("tunnel.log");
        let err = build_logger(path.to_str().unwrap(), "INFO").unwrap_err();
        assert!(matches!(err, ConfigError::OpenLog { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn bad_level_fails_before_touching_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tunnel.log");
        assert!(build_logger(path.to_str().unwrap(), "nope").is_err());
        assert!(!path.exists());
    }
}
