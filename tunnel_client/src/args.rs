//! Command-line arguments for the tunnel client.
//!
//! This module defines the CLI interface using `clap`. Classification of the
//! positional words into a command lives in `options`.
use clap::Parser;

/// Configuration file read when `--config-path` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/tunnel/client.yml";
/// Logging disabled unless asked for.
pub const DEFAULT_LOG_TO: &str = "none";
/// Default minimum log level.
pub const DEFAULT_LOG_LEVEL: &str = "WARNING";
/// Tunnel both plain and TLS HTTP by default.
pub const DEFAULT_PROTOCOL: &str = "http+https";
/// Base path requested for HTTP tunnels.
pub const DEFAULT_REQUEST_PATH: &str = "/";
/// Candidate trusted CA bundles; the first is the default.
pub const DEFAULT_ROOT_CRT_PATHS: [&str; 2] = [
    "assets/client/tls/rootca.crt",
    "assets/client/tls/snakeoilca.crt",
];

const USAGE: &str = "tunnel_client [OPTIONS] <local port or address>
       tunnel_client [OPTIONS] <command> [command args] [...]";

const AFTER_HELP: &str = "Examples:
    tunnel_client 80
    tunnel_client --subdomain=example 8080
    tunnel_client --proto=tcp 22
    tunnel_client --hostname=\"example.com\" --httpauth=\"user:password\" 10.0.0.1

Commands:
    tunnel_client start [tunnel] [...]    Start tunnels by name from config file
    tunnel_client start-all               Start all tunnels defined in config file
    tunnel_client list                    List tunnel names from config file
    tunnel_client help                    Print help
    tunnel_client version                 Print tunnel_client version

Examples:
    tunnel_client start www api blog pubsub
    tunnel_client --log=stdout --config-path=tunnel.yml start ssh
    tunnel_client start-all
    tunnel_client version";

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tunnel_client",
    version,
    about = "Expose a local service through a public tunnel endpoint",
    long_about = None,
    override_usage = USAGE,
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Path to the client configuration file.
    #[clap(long = "config-path", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: String,

    /// Write log messages to this file. 'stdout' and 'none' have special meanings.
    #[clap(long = "log", default_value = DEFAULT_LOG_TO)]
    pub log_to: String,

    /// The level of messages to log. One of: DEBUG, INFO, WARNING, ERROR.
    #[clap(long = "log-level", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Authentication token for identifying with the server.
    #[clap(long = "authtoken", default_value = "")]
    pub auth_token: String,

    /// username:password HTTP basic auth creds protecting the public tunnel endpoint.
    #[clap(long = "httpauth", default_value = "")]
    pub http_auth: String,

    /// Request a custom subdomain from the server. (HTTP only)
    #[clap(long, default_value = "")]
    pub subdomain: String,

    /// Request a custom request path from the server. (HTTP only)
    #[clap(long = "requestPath", default_value = DEFAULT_REQUEST_PATH)]
    pub request_path: String,

    /// Request a custom hostname from the server. (HTTP only) (requires CNAME of your DNS)
    #[clap(long, default_value = "")]
    pub hostname: String,

    /// The protocol of the traffic over the tunnel {'http', 'https', 'tcp'} or 'http+https'.
    #[clap(long = "proto", default_value = DEFAULT_PROTOCOL)]
    pub protocol: String,

    /// Path to the trusted root certificate bundle.
    #[clap(long = "root-crt-paths", default_value = DEFAULT_ROOT_CRT_PATHS[0])]
    pub root_crt_path: String,

    /// A local port or address, or a command followed by its arguments.
    #[clap(value_name = "PORT|COMMAND", trailing_var_arg = true)]
    pub positional: Vec<String>,
}
