//! Error types shared between client and server.
//!
//! The `ConfigError` enum covers every way startup resolution can fail: bad
//! command-line shape, unreadable or malformed configuration files, and invalid
//! field values. Each variant carries the field, value or path it refers to.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error originating from the standard library (log files, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The positional arguments do not describe a runnable command.
    #[error("{0}")]
    Usage(String),

    /// A flag could not be parsed.
    #[error("{0}")]
    Flags(#[from] clap::Error),

    /// An explicitly requested configuration file could not be read.
    #[error("Failed to read configuration file {}: {source}", path.display())]
    ReadConfig {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying read failure.
        source: io::Error,
    },

    /// The configuration file is not valid YAML for the expected record.
    #[error("Error parsing configuration file {}: {source}", path.display())]
    ParseConfig {
        /// Path of the file being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_yaml::Error,
    },

    /// An address field is not in `host:port` form.
    #[error("Invalid address {field} '{addr}': {reason}")]
    InvalidAddress {
        /// Name of the field holding the address.
        field: String,
        /// The offending value, after bare-port expansion.
        addr: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A protocol selector is not one of the supported values.
    #[error("Invalid protocol for {field}: {proto}")]
    InvalidProtocol {
        /// Name of the field holding the protocol.
        field: String,
        /// The offending value.
        proto: String,
    },

    /// A required configuration value is absent.
    #[error("Missing value for {field}: {reason}")]
    MissingValue {
        /// Name of the field that needs a value.
        field: String,
        /// What is expected there.
        reason: String,
    },

    /// The log destination file could not be opened.
    #[error("Failed to open log file {}: {source}", path.display())]
    OpenLog {
        /// Destination that was requested.
        path: PathBuf,
        /// Underlying open failure.
        source: io::Error,
    },

    /// A log level string is not recognized.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// A tunnel was requested by name but is not configured.
    #[error("Requested to start tunnel {0} which is not defined in the config file")]
    UnknownTunnel(String),

    /// The logging backend could not be installed.
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<log::SetLoggerError> for ConfigError {
    fn from(err: log::SetLoggerError) -> Self {
        ConfigError::Logger(err.to_string())
    }
}
