//! Tunnel server — accepts tunnel clients and exposes their services on public
//! HTTP, HTTPS and TCP endpoints.
//!
//! Startup happens in a fixed order:
//! - `args` — command-line flags (configuration path, log destination and level).
//! - `config` — the optional YAML file merged with defaults and the log flags into
//!   a `ServerConfiguration` that stays read-only for the life of the process.
//! - logging — installed from the resolved `log_to` / `log_level`.
//!
//! Usage example (CLI):
//! ```bash
//! tunnel_server --config-path ./server.yml --log stdout --log-level DEBUG
//! ```
#![warn(missing_docs)]
mod args;
mod config;

use std::process::ExitCode;

use log::{info, warn};
use tunnel_common::Result;
use tunnel_common::logging::init_logger;

use crate::args::{Args, parse_args};
use crate::config::{LoadOverrides, ServerConfiguration, load_configuration};

fn main() -> ExitCode {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_configuration(&LoadOverrides::from(args))?;
    init_logger(&config.log_to, &config.log_level)?;
    report(&config);
    Ok(())
}

/// Log the effective configuration for the listener and TLS layers.
fn report(config: &ServerConfiguration) {
    info!("Configuration loaded from {}", config.config_path.display());
    info!("HTTP listener: {}", config.http_addr);
    info!("HTTPS listener: {}", config.https_addr);
    info!("Tunnel listener: {}", config.tunnel_addr);
    match &config.hostname {
        Some(hostname) => info!("Serving tunnels under {}", hostname),
        None => warn!("No hostname configured; tunnels are addressed by listener only"),
    }
    match (&config.tls_crt, &config.tls_key) {
        (Some(crt), Some(key)) => {
            info!("TLS certificate {} with key {}", crt.display(), key.display())
        }
        (None, None) => info!("No TLS material configured; using built-in certificates"),
        _ => warn!("tls_crt and tls_key must be set together; using built-in certificates"),
    }
}
