//! Client configuration file: server location, credentials and named tunnels.
//!
//! ```yaml
//! server_addr: tunnel.example.com:4443
//! auth_token: abc123
//! tunnels:
//!   www:
//!     subdomain: www
//!     proto:
//!       http+https: 80
//!   ssh:
//!     remote_port: 2222
//!     proto:
//!       tcp: 22
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use tunnel_common::config_file::load_yaml;
use tunnel_common::{ConfigError, Protocol, Result, normalize_address, validate_protocol};

use crate::args::DEFAULT_CONFIG_PATH;
use crate::options::ResolvedOptions;

/// Server the client connects to when the file names none.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:4443";
/// Local traffic inspection listener when the file names none.
pub const DEFAULT_INSPECT_ADDR: &str = "127.0.0.1:4040";
/// `inspect_addr` value that turns inspection off.
pub const INSPECT_DISABLED: &str = "disabled";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfiguration {
    server_addr: String,
    inspect_addr: String,
    auth_token: String,
    trust_host_root_certs: bool,
    tunnels: BTreeMap<String, TunnelFileConfiguration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TunnelFileConfiguration {
    proto: BTreeMap<String, String>,
    subdomain: String,
    hostname: String,
    auth: String,
    remote_port: Option<u16>,
}

/// A tunnel defined in the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct TunnelConfiguration {
    /// Local target per protocol, in `host:port` form.
    pub protocols: BTreeMap<Protocol, String>,
    /// Requested subdomain.
    pub subdomain: Option<String>,
    /// Requested hostname.
    pub hostname: Option<String>,
    /// `user:password` for the public endpoint.
    pub http_auth: Option<String>,
    /// Requested public port for TCP tunnels.
    pub remote_port: Option<u16>,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfiguration {
    /// Tunnel server, in `host:port` form.
    pub server_addr: String,
    /// Inspection listener, `None` when disabled.
    pub inspect_addr: Option<String>,
    /// Token identifying the client; `--authtoken` wins over the file.
    pub auth_token: String,
    /// Trust the host's root certificates in addition to the bundle.
    pub trust_host_root_certs: bool,
    /// Named tunnels.
    pub tunnels: BTreeMap<String, TunnelConfiguration>,
    /// Configuration file that was read (or would have been).
    pub config_path: PathBuf,
}

/// Load the client configuration named by `options.config_path`.
///
/// The file is optional unless the path differs from [`DEFAULT_CONFIG_PATH`].
pub fn load_client_configuration(options: &ResolvedOptions) -> Result<ClientConfiguration> {
    load_with_default(options, Path::new(DEFAULT_CONFIG_PATH))
}

fn load_with_default(options: &ResolvedOptions, default_path: &Path) -> Result<ClientConfiguration> {
    let requested = Path::new(&options.config_path);
    let explicit = (requested != Path::new(DEFAULT_CONFIG_PATH)).then_some(requested);
    let (file, config_path) = load_yaml::<FileConfiguration>(explicit, default_path)?;

    let server_addr = normalize_address(
        or_default(&file.server_addr, DEFAULT_SERVER_ADDR),
        "server_addr",
    )?;
    let inspect_addr = match or_default(&file.inspect_addr, DEFAULT_INSPECT_ADDR) {
        INSPECT_DISABLED => None,
        addr => Some(normalize_address(addr, "inspect_addr")?),
    };

    let auth_token = if options.auth_token.is_empty() {
        file.auth_token
    } else {
        debug!("Using auth token from the command line");
        options.auth_token.clone()
    };

    let tunnels = file
        .tunnels
        .into_iter()
        .map(|(name, tunnel)| {
            let tunnel = resolve_tunnel(&name, tunnel)?;
            Ok((name, tunnel))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(ClientConfiguration {
        server_addr,
        inspect_addr,
        auth_token,
        trust_host_root_certs: file.trust_host_root_certs,
        tunnels,
        config_path,
    })
}

fn resolve_tunnel(name: &str, tunnel: TunnelFileConfiguration) -> Result<TunnelConfiguration> {
    if tunnel.proto.is_empty() {
        return Err(ConfigError::MissingValue {
            field: format!("tunnels.{name}.proto"),
            reason: "no protocols to tunnel".to_string(),
        });
    }

    let mut protocols = BTreeMap::new();
    for (proto, target) in &tunnel.proto {
        let protocol = validate_protocol(proto, &format!("tunnels.{name}.proto"))?;
        let target = normalize_address(target, &format!("tunnels.{name}.proto.{proto}"))?;
        for expanded in protocol.expand() {
            protocols.insert(expanded, target.clone());
        }
    }

    Ok(TunnelConfiguration {
        protocols,
        subdomain: non_empty(tunnel.subdomain),
        hostname: non_empty(tunnel.hostname),
        http_auth: non_empty(tunnel.auth),
        remote_port: tunnel.remote_port,
    })
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
