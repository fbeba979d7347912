//! Command-line arguments for the tunnel server.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::LoadOverrides;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Public endpoint server for tunnel clients", long_about = None)]
pub struct Args {
    /// Path to the server configuration file (defaults to /etc/tunnel/server.yml).
    #[clap(long = "config-path")]
    pub config_path: Option<PathBuf>,

    /// Write log messages to this file. 'stdout' and 'none' have special meanings.
    #[clap(long = "log", default_value = "stdout")]
    pub log_to: String,

    /// The level of messages to log. One of: DEBUG, INFO, WARNING, ERROR.
    #[clap(long = "log-level", default_value = "INFO")]
    pub log_level: String,
}

/// Parse `argv` (program name first). Help, version and bad flags come back as
/// `clap` errors for the caller to report.
pub fn parse_args<I, T>(argv: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv)
}

impl From<Args> for LoadOverrides {
    fn from(args: Args) -> Self {
        LoadOverrides {
            config_path: args.config_path,
            log_to: args.log_to,
            log_level: args.log_level,
        }
    }
}
