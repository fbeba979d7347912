//! Address normalization shared by client and server.
//!
//! Every listen or target address in the workspace is carried as a `host:port`
//! string. Users may write a bare port (`80`), an address without a host (`:80`)
//! or a full address; `normalize_address` turns all of these into one form.

use crate::error::ConfigError;
use crate::result::Result;

/// Host substituted when an address omits one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Normalize `addr` into `host:port` form.
///
/// - a bare integer is taken as a port (`"80"` becomes `":80"`);
/// - the host defaults to [`DEFAULT_HOST`] when empty;
/// - IPv6 hosts are rendered in brackets (`[::1]:80`).
///
/// `field` names the setting being normalized and is reported in the error
/// together with the offending value.
pub fn normalize_address(addr: &str, field: &str) -> Result<String> {
    let addr = if addr.parse::<i64>().is_ok() {
        format!(":{addr}")
    } else {
        addr.to_string()
    };

    let (host, port) = split_host_port(&addr).map_err(|reason| ConfigError::InvalidAddress {
        field: field.to_string(),
        addr: addr.clone(),
        reason: reason.to_string(),
    })?;

    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    Ok(join_host_port(host, port))
}

/// Split `host:port`, accepting `[v6]:port` for IPv6 literals.
fn split_host_port(addr: &str) -> std::result::Result<(&str, u16), &'static str> {
    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, rest) = rest.split_once(']').ok_or("missing ']' in address")?;
        let port = rest.strip_prefix(':').ok_or("missing port in address")?;
        (host, port)
    } else {
        let (host, port) = addr.rsplit_once(':').ok_or("missing port in address")?;
        if host.contains(':') {
            return Err("too many colons in address");
        }
        (host, port)
    };

    if host.contains(['[', ']']) {
        return Err("unexpected bracket in address");
    }
    if port.is_empty() {
        return Err("missing port in address");
    }
    // u16 parsing also accepts a leading '+', which is not a port
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid port");
    }
    let port = port.parse::<u16>().map_err(|_| "invalid port")?;
    Ok((host, port))
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
