//! Resolution of the client command line into options and an execution mode.
//!
//! `resolve` is a pure function of the argument vector: help and version
//! requests come back as [`Resolution`] variants instead of exiting, so the
//! caller decides what to print and when to terminate.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use strum_macros::{Display, EnumString};
use tunnel_common::{ConfigError, Result};

use crate::args::Args;

/// Operating mode selected by the first positional word.
#[derive(Debug, Clone, Copy, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    /// Tunnel a single port or address given on the command line.
    Default,
    /// Start the named tunnels from the configuration file.
    Start,
    /// Start every tunnel in the configuration file.
    StartAll,
    /// Print the tunnel names from the configuration file.
    List,
    /// Print usage.
    Help,
    /// Print the version.
    Version,
    /// Nothing to run.
    Error,
}

impl Command {
    /// Classify the first positional word. Anything that is not a command
    /// keyword is a port or address to tunnel; an empty word is no command.
    pub fn classify(first: Option<&str>) -> Command {
        let Some(word) = first.filter(|word| !word.is_empty()) else {
            return Command::Error;
        };
        match word.parse::<Command>() {
            Ok(
                command @ (Command::List
                | Command::Start
                | Command::StartAll
                | Command::Help
                | Command::Version),
            ) => command,
            _ => Command::Default,
        }
    }
}

/// Settings and mode resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Client configuration file.
    pub config_path: String,
    /// Log destination.
    pub log_to: String,
    /// Minimum log level.
    pub log_level: String,
    /// Token identifying the caller to the server.
    pub auth_token: String,
    /// `user:password` enforced on the public endpoint.
    pub http_auth: String,
    /// Requested custom hostname.
    pub hostname: String,
    /// Protocol selector, validated when the tunnel is planned.
    pub protocol: String,
    /// Requested custom subdomain.
    pub subdomain: String,
    /// Requested base request path.
    pub request_path: String,
    /// Trusted CA bundle.
    pub root_crt_path: String,
    /// Selected mode; never `Help`, `Version` or `Error`.
    pub command: Command,
    /// Tunnel names for `start`/`start-all`/`list`, the single target for `default`.
    pub args: Vec<String>,
}

impl ResolvedOptions {
    fn new(args: Args, command: Command, command_args: Vec<String>) -> Self {
        Self {
            config_path: args.config_path,
            log_to: args.log_to,
            log_level: args.log_level,
            auth_token: args.auth_token,
            http_auth: args.http_auth,
            hostname: args.hostname,
            protocol: args.protocol,
            subdomain: args.subdomain,
            request_path: args.request_path,
            root_crt_path: args.root_crt_path,
            command,
            args: command_args,
        }
    }
}

/// Outcome of resolving the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Usage text to print before exiting successfully.
    Help(String),
    /// Version string to print before exiting successfully.
    Version(String),
    /// Options for a runnable command.
    Resolved(ResolvedOptions),
}

/// `MAJOR.MINOR` of this build.
pub fn version() -> String {
    format!(
        "{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}

/// Full usage text.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Resolve `argv` (without the program name) into a [`Resolution`].
pub fn resolve<I, T>(argv: I) -> Result<Resolution>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv = std::iter::once(OsString::from("tunnel_client")).chain(argv.into_iter().map(Into::into));
    let mut args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => return Ok(Resolution::Help(usage())),
        Err(e) if e.kind() == ErrorKind::DisplayVersion => return Ok(Resolution::Version(version())),
        Err(e) => return Err(e.into()),
    };

    let mut positional = std::mem::take(&mut args.positional);
    let command = Command::classify(positional.first().map(String::as_str));
    let command_args = match command {
        Command::List | Command::Start | Command::StartAll => positional.split_off(1),
        Command::Version => return Ok(Resolution::Version(version())),
        Command::Help => return Ok(Resolution::Help(usage())),
        Command::Error => {
            return Err(ConfigError::Usage(
                "Error: Specify a local port to tunnel to, or a tunnel_client command.\n\n\
                 Example: To expose port 80, run 'tunnel_client 80'"
                    .to_string(),
            ));
        }
        Command::Default => {
            if positional.len() > 1 {
                return Err(ConfigError::Usage(format!(
                    "You may only specify one port to tunnel to on the command line, got {}: {:?}",
                    positional.len(),
                    positional
                )));
            }
            positional
        }
    };

    Ok(Resolution::Resolved(ResolvedOptions::new(args, command, command_args)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(argv: &[&str]) -> ResolvedOptions {
        match resolve(argv.iter().copied()).unwrap() {
            Resolution::Resolved(options) => options,
            other => panic!("expected resolved options, got {other:?}"),
        }
    }

    #[test]
    fn classifies_keywords() {
        assert_eq!(Command::classify(Some("list")), Command::List);
        assert_eq!(Command::classify(Some("start")), Command::Start);
        assert_eq!(Command::classify(Some("start-all")), Command::StartAll);
        assert_eq!(Command::classify(Some("help")), Command::Help);
        assert_eq!(Command::classify(Some("version")), Command::Version);
        assert_eq!(Command::classify(Some("8080")), Command::Default);
        assert_eq!(Command::classify(Some("default")), Command::Default);
        assert_eq!(Command::classify(Some("error")), Command::Default);
        assert_eq!(Command::classify(None), Command::Error);
        assert_eq!(Command::classify(Some("")), Command::Error);
    }

    #[test]
    fn empty_first_word_asks_for_port_or_command() {
        let err = resolve([""]).unwrap_err();
        assert!(matches!(err, ConfigError::Usage(_)));
        assert!(err.to_string().contains("Specify a local port"));
    }

    #[test]
    fn start_collects_tunnel_names() {
        let options = resolved(&["start", "www", "api"]);
        assert_eq!(options.command, Command::Start);
        assert_eq!(options.args, ["www", "api"]);
    }

    #[test]
    fn start_all_and_list_accept_no_names() {
        let options = resolved(&["start-all"]);
        assert_eq!(options.command, Command::StartAll);
        assert!(options.args.is_empty());

        let options = resolved(&["list"]);
        assert_eq!(options.command, Command::List);
        assert!(options.args.is_empty());
    }

    #[test]
    fn bare_port_is_default_mode() {
        let options = resolved(&["--subdomain=demo", "8080"]);
        assert_eq!(options.command, Command::Default);
        assert_eq!(options.args, ["8080"]);
        assert_eq!(options.subdomain, "demo");
        assert_eq!(options.protocol, "http+https");
        assert_eq!(options.log_to, "none");
        assert_eq!(options.log_level, "WARNING");
    }

    #[test]
    fn no_positional_asks_for_port_or_command() {
        let err = resolve(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Usage(_)));
        assert!(err.to_string().contains("Specify a local port to tunnel to"));
    }

    #[test]
    fn more_than_one_port_is_rejected() {
        let err = resolve(["8080", "extra"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("got 2"), "{msg}");
        assert!(msg.contains("extra"), "{msg}");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert!(matches!(resolve(["help"]).unwrap(), Resolution::Help(_)));
        assert!(matches!(resolve(["--help"]).unwrap(), Resolution::Help(_)));
        assert_eq!(resolve(["version"]).unwrap(), Resolution::Version(version()));
        assert_eq!(resolve(["version", "extra"]).unwrap(), Resolution::Version(version()));
    }

    #[test]
    fn usage_lists_commands() {
        let text = usage();
        assert!(text.contains("start-all"));
        assert!(text.contains("--requestPath"));
    }

    #[test]
    fn version_is_major_minor() {
        assert_eq!(version().split('.').count(), 2);
    }

    #[test]
    fn unknown_flag_is_a_flag_error() {
        let err = resolve(["--bogus", "80"]).unwrap_err();
        assert!(matches!(err, ConfigError::Flags(_)));
    }

    #[test]
    fn repeated_resolution_is_independent() {
        let first = resolved(&["--authtoken=abc", "80"]);
        let second = resolved(&["80"]);
        assert_eq!(first.auth_token, "abc");
        assert_eq!(second.auth_token, "");
    }
}
