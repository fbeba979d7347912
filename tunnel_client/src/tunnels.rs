//! Turning the selected command into the list of tunnels to request.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use tunnel_common::{ConfigError, Protocol, Result, normalize_address, validate_protocol};

use crate::config::{ClientConfiguration, TunnelConfiguration, non_empty};
use crate::options::{Command, ResolvedOptions};

/// Name given to the tunnel built from command-line flags.
pub const DEFAULT_TUNNEL_NAME: &str = "default";

/// One tunnel the client will ask the server for.
#[derive(Debug, Clone, PartialEq)]
pub struct TunnelPlan {
    /// Tunnel name (`default` for the command-line tunnel).
    pub name: String,
    /// Local target per public protocol.
    pub protocols: BTreeMap<Protocol, String>,
    /// Requested subdomain (HTTP family only).
    pub subdomain: Option<String>,
    /// Requested hostname (HTTP family only).
    pub hostname: Option<String>,
    /// Basic auth on the public endpoint.
    pub http_auth: Option<String>,
    /// Requested base path (HTTP family only).
    pub request_path: Option<String>,
    /// Requested public port for TCP.
    pub remote_port: Option<u16>,
}

impl TunnelPlan {
    fn from_config(name: &str, tunnel: &TunnelConfiguration) -> Self {
        Self {
            name: name.to_string(),
            protocols: tunnel.protocols.clone(),
            subdomain: tunnel.subdomain.clone(),
            hostname: tunnel.hostname.clone(),
            http_auth: tunnel.http_auth.clone(),
            request_path: None,
            remote_port: tunnel.remote_port,
        }
    }

    fn from_options(options: &ResolvedOptions) -> Result<Self> {
        let protocol = validate_protocol(&options.protocol, "proto")?;
        let target = options.args.first().ok_or_else(|| {
            ConfigError::Usage("Specify a local port to tunnel to".to_string())
        })?;
        let target = normalize_address(target, "port")?;

        let protocols: BTreeMap<_, _> = protocol
            .expand()
            .into_iter()
            .map(|p| (p, target.clone()))
            .collect();

        let mut plan = Self {
            name: DEFAULT_TUNNEL_NAME.to_string(),
            protocols,
            subdomain: non_empty(options.subdomain.clone()),
            hostname: non_empty(options.hostname.clone()),
            http_auth: non_empty(options.http_auth.clone()),
            request_path: Some(options.request_path.clone()),
            remote_port: None,
        };

        if !protocol.is_http_family() {
            if plan.subdomain.is_some() || plan.hostname.is_some() {
                warn!("--subdomain and --hostname only apply to HTTP tunnels; ignoring them for {protocol}");
            }
            plan.subdomain = None;
            plan.hostname = None;
            plan.request_path = None;
        }
        Ok(plan)
    }
}

impl fmt::Display for TunnelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (protocol, target) in &self.protocols {
            write!(f, " {protocol} -> {target}")?;
        }
        if let Some(subdomain) = &self.subdomain {
            write!(f, " (subdomain {subdomain})")?;
        }
        if let Some(hostname) = &self.hostname {
            write!(f, " (hostname {hostname})")?;
        }
        if let Some(path) = self.request_path.as_deref().filter(|path| *path != "/") {
            write!(f, " (path {path})")?;
        }
        if self.http_auth.is_some() {
            write!(f, " (basic auth)")?;
        }
        if let Some(port) = self.remote_port {
            write!(f, " (remote port {port})")?;
        }
        Ok(())
    }
}

/// Tunnels to request for the selected command.
///
/// - `default`: one tunnel from the command-line flags and target;
/// - `start`: the named tunnels, in the order given;
/// - `start-all`: every configured tunnel, by name;
/// - anything else: none.
pub fn plan_tunnels(options: &ResolvedOptions, config: &ClientConfiguration) -> Result<Vec<TunnelPlan>> {
    match options.command {
        Command::Default => Ok(vec![TunnelPlan::from_options(options)?]),
        Command::Start => options
            .args
            .iter()
            .map(|name| {
                config
                    .tunnels
                    .get(name)
                    .map(|tunnel| TunnelPlan::from_config(name, tunnel))
                    .ok_or_else(|| ConfigError::UnknownTunnel(name.clone()))
            })
            .collect(),
        Command::StartAll => {
            if !options.args.is_empty() {
                warn!("start-all starts every configured tunnel; ignoring {:?}", options.args);
            }
            Ok(config
                .tunnels
                .iter()
                .map(|(name, tunnel)| TunnelPlan::from_config(name, tunnel))
                .collect())
        }
        Command::List | Command::Help | Command::Version | Command::Error => Ok(Vec::new()),
    }
}
