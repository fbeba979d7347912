//! Tunnel client — exposes local services through public endpoints on a tunnel
//! server. Tunnels come either from the command line (a single port or address)
//! or by name from the client configuration file.
//!
//! Usage example (CLI):
//! ```bash
//! tunnel_client --subdomain=example 8080
//! tunnel_client --log=stdout --config-path=tunnel.yml start www ssh
//! tunnel_client list
//! ```
//!
//! The command line is resolved first (`options`), which decides the mode. Modes
//! that need tunnels then read the configuration file (`config`) and turn the
//! request into a list of tunnels (`tunnels`) handed to the transport.
#![warn(missing_docs)]
mod args;
mod config;
mod options;
mod tunnels;

use std::process::ExitCode;

use log::{debug, error, info, warn};
use tunnel_common::Result;
use tunnel_common::logging::init_logger;

use crate::config::load_client_configuration;
use crate::options::{Command, Resolution, ResolvedOptions, resolve};
use crate::tunnels::plan_tunnels;

fn main() -> ExitCode {
    match resolve(std::env::args_os().skip(1)) {
        Ok(Resolution::Help(usage)) => {
            println!("{usage}");
            ExitCode::SUCCESS
        }
        Ok(Resolution::Version(version)) => {
            println!("{version}");
            ExitCode::SUCCESS
        }
        Ok(Resolution::Resolved(options)) => match run(&options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &ResolvedOptions) -> Result<()> {
    init_logger(&options.log_to, &options.log_level)?;
    debug!("Resolved command {} with arguments {:?}", options.command, options.args);

    let config = load_client_configuration(options)?;
    info!("Using configuration {}", config.config_path.display());

    if options.command == Command::List {
        for name in config.tunnels.keys() {
            println!("{name}");
        }
        return Ok(());
    }

    let plans = plan_tunnels(options, &config)?;
    if plans.is_empty() {
        warn!("No tunnels to start");
        return Ok(());
    }

    info!(
        "Requesting {} tunnel(s) from {} (trusted roots: {})",
        plans.len(),
        config.server_addr,
        options.root_crt_path
    );
    if config.auth_token.is_empty() {
        warn!("No auth token configured; the server may refuse anonymous tunnels");
    }
    if config.trust_host_root_certs {
        debug!("Trusting host root certificates in addition to the bundle");
    }
    if let Some(inspect_addr) = &config.inspect_addr {
        info!("Traffic inspection on {}", inspect_addr);
    }
    for plan in &plans {
        info!("Tunnel {}", plan);
        println!("{plan}");
    }
    Ok(())
}
