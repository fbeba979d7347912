//! Tunnel protocol selector shared between client and server.

use strum_macros::{Display, EnumString};

use crate::error::ConfigError;
use crate::result::Result;

/// Protocols a tunnel may carry.
///
/// `HttpHttps` is the combined mode and stands for one `Http` and one `Https`
/// endpoint forwarding to the same local address.
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
pub enum Protocol {
    /// Plain HTTP.
    #[strum(serialize = "http")]
    Http,
    /// HTTP over TLS.
    #[strum(serialize = "https")]
    Https,
    /// Both `http` and `https`.
    #[strum(serialize = "http+https")]
    HttpHttps,
    /// Raw TCP.
    #[strum(serialize = "tcp")]
    Tcp,
}

impl Protocol {
    /// The concrete endpoint protocols this selector stands for.
    pub fn expand(self) -> Vec<Protocol> {
        match self {
            Protocol::HttpHttps => vec![Protocol::Http, Protocol::Https],
            other => vec![other],
        }
    }

    /// Whether the protocol understands hostnames, subdomains and request paths.
    pub fn is_http_family(self) -> bool {
        !matches!(self, Protocol::Tcp)
    }
}

/// Check that `proto` is one of `http`, `https`, `http+https` or `tcp`.
///
/// Matching is exact. On failure the error names `field` and the rejected value.
pub fn validate_protocol(proto: &str, field: &str) -> Result<Protocol> {
    proto.parse::<Protocol>().map_err(|_| ConfigError::InvalidProtocol {
        field: field.to_string(),
        proto: proto.to_string(),
    })
}
