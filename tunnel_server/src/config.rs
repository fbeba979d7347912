//! Server configuration loading.
//!
//! The effective configuration is assembled in a fixed order of steps on a
//! [`ConfigurationBuilder`]:
//!
//! 1. `from_file` — values read from the YAML file (or nothing, if absent).
//! 2. `apply_address_defaults` — fills the listen addresses the file left unset.
//! 3. `normalize_addresses` — rewrites the listen addresses into `host:port`.
//! 4. `apply_overrides` — command-line log destination and level.
//! 5. `build` — records the configuration path that was used.
//!
//! Only step 4 sees the command line, and it only touches the two log fields.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use tunnel_common::Result;
use tunnel_common::config_file::load_yaml;
use tunnel_common::normalize_address;

/// Configuration file read when no path is given.
pub const DEFAULT_PATH: &str = "/etc/tunnel/server.yml";
/// Public HTTP listener used when the file sets none.
pub const DEFAULT_HTTP_ADDR: &str = ":80";
/// Public HTTPS listener used when the file sets none.
pub const DEFAULT_HTTPS_ADDR: &str = ":443";
/// Tunnel control listener used when the file sets none.
pub const DEFAULT_TUNNEL_ADDR: &str = ":4443";

/// Raw contents of the server configuration file. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfiguration {
    /// `http_addr`
    pub http_addr: String,
    /// `https_addr`
    pub https_addr: String,
    /// `tunnel_addr`
    pub tunnel_addr: String,
    /// `hostname`
    pub hostname: String,
    /// `tls_crt`
    pub tls_crt: String,
    /// `tls_key`
    pub tls_key: String,
    /// `log_to`
    pub log_to: String,
    /// `log_level`
    pub log_level: String,
}

/// Values taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOverrides {
    /// Explicitly requested configuration file, if any.
    pub config_path: Option<PathBuf>,
    /// Log destination; always wins over the file.
    pub log_to: String,
    /// Log level; always wins over the file.
    pub log_level: String,
}

/// Fully resolved server configuration.
///
/// Address fields are always in normalized `host:port` form.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfiguration {
    /// Public HTTP listener.
    pub http_addr: String,
    /// Public HTTPS listener.
    pub https_addr: String,
    /// Listener accepting tunnel clients.
    pub tunnel_addr: String,
    /// Public hostname tunnels are served under.
    pub hostname: Option<String>,
    /// TLS certificate presented on the HTTPS and tunnel listeners.
    pub tls_crt: Option<PathBuf>,
    /// Private key for `tls_crt`.
    pub tls_key: Option<PathBuf>,
    /// Log destination (`stdout`, `none` or a file path).
    pub log_to: String,
    /// Minimum log level.
    pub log_level: String,
    /// Configuration file that was read (or would have been).
    pub config_path: PathBuf,
}

/// Mutable staging area for [`ServerConfiguration`].
#[derive(Debug, Default, Clone)]
pub struct ConfigurationBuilder {
    http_addr: String,
    https_addr: String,
    tunnel_addr: String,
    hostname: String,
    tls_crt: String,
    tls_key: String,
    log_to: String,
    log_level: String,
}

impl ConfigurationBuilder {
    /// Step 1. Seeds every field from the file.
    pub fn from_file(file: FileConfiguration) -> Self {
        Self {
            http_addr: file.http_addr,
            https_addr: file.https_addr,
            tunnel_addr: file.tunnel_addr,
            hostname: file.hostname,
            tls_crt: file.tls_crt,
            tls_key: file.tls_key,
            log_to: file.log_to,
            log_level: file.log_level,
        }
    }

    /// Step 2. Touches `http_addr`, `https_addr`, `tunnel_addr`, and only when empty.
    pub fn apply_address_defaults(mut self) -> Self {
        for (field, default) in [
            (&mut self.http_addr, DEFAULT_HTTP_ADDR),
            (&mut self.https_addr, DEFAULT_HTTPS_ADDR),
            (&mut self.tunnel_addr, DEFAULT_TUNNEL_ADDR),
        ] {
            if field.is_empty() {
                *field = default.to_string();
            }
        }
        self
    }

    /// Step 3. Touches `http_addr`, `https_addr`, `tunnel_addr`.
    pub fn normalize_addresses(mut self) -> Result<Self> {
        self.http_addr = normalize_address(&self.http_addr, "HTTPAddr")?;
        self.https_addr = normalize_address(&self.https_addr, "HTTPSAddr")?;
        self.tunnel_addr = normalize_address(&self.tunnel_addr, "TunnelAddr")?;
        Ok(self)
    }

    /// Step 4. Touches `log_to` and `log_level`, unconditionally.
    pub fn apply_overrides(mut self, overrides: &LoadOverrides) -> Self {
        if self.log_to != overrides.log_to || self.log_level != overrides.log_level {
            debug!(
                "Command line log settings ({}, {}) replace file settings ({}, {})",
                overrides.log_to, overrides.log_level, self.log_to, self.log_level
            );
        }
        self.log_to = overrides.log_to.clone();
        self.log_level = overrides.log_level.clone();
        self
    }

    /// Step 5. Records `config_path` and freezes the result.
    pub fn build(self, config_path: PathBuf) -> ServerConfiguration {
        ServerConfiguration {
            http_addr: self.http_addr,
            https_addr: self.https_addr,
            tunnel_addr: self.tunnel_addr,
            hostname: non_empty(self.hostname),
            tls_crt: non_empty(self.tls_crt).map(PathBuf::from),
            tls_key: non_empty(self.tls_key).map(PathBuf::from),
            log_to: self.log_to,
            log_level: self.log_level,
            config_path,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Load the server configuration from [`DEFAULT_PATH`] or the requested file.
pub fn load_configuration(overrides: &LoadOverrides) -> Result<ServerConfiguration> {
    load_configuration_with_default(overrides, Path::new(DEFAULT_PATH))
}

fn load_configuration_with_default(
    overrides: &LoadOverrides,
    default_path: &Path,
) -> Result<ServerConfiguration> {
    let (file, path) = load_yaml::<FileConfiguration>(overrides.config_path.as_deref(), default_path)?;

    Ok(ConfigurationBuilder::from_file(file)
        .apply_address_defaults()
        .normalize_addresses()?
        .apply_overrides(overrides)
        .build(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tunnel_common::ConfigError;

    fn overrides(config_path: Option<PathBuf>) -> LoadOverrides {
        LoadOverrides {
            config_path,
            log_to: "stdout".to_string(),
            log_level: "DEBUG".to_string(),
        }
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("server.yml");
        let config = load_configuration_with_default(&overrides(None), &default_path).unwrap();

        assert_eq!(config.http_addr, "127.0.0.1:80");
        assert_eq!(config.https_addr, "127.0.0.1:443");
        assert_eq!(config.tunnel_addr, "127.0.0.1:4443");
        assert_eq!(config.hostname, None);
        assert_eq!(config.tls_crt, None);
        assert_eq!(config.config_path, default_path);
    }

    #[test]
    fn missing_explicit_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let requested = dir.path().join("requested.yml");
        let err = load_configuration_with_default(
            &overrides(Some(requested)),
            &dir.path().join("server.yml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ReadConfig { .. }));
    }

    #[test]
    fn file_values_are_normalized() {
        let file = config_file(
            "http_addr: '8080'\nhttps_addr: 0.0.0.0:8443\ntunnel_addr: ':9000'\n\
             hostname: tunnel.example.com\ntls_crt: /etc/tunnel/crt.pem\ntls_key: /etc/tunnel/key.pem\n",
        );
        let config = load_configuration(&overrides(Some(file.path().to_path_buf()))).unwrap();

        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.https_addr, "0.0.0.0:8443");
        assert_eq!(config.tunnel_addr, "127.0.0.1:9000");
        assert_eq!(config.hostname.as_deref(), Some("tunnel.example.com"));
        assert_eq!(config.tls_crt, Some(PathBuf::from("/etc/tunnel/crt.pem")));
        assert_eq!(config.tls_key, Some(PathBuf::from("/etc/tunnel/key.pem")));
        assert_eq!(config.config_path, file.path());
    }

    #[test]
    fn command_line_log_settings_always_win() {
        let file = config_file("log_to: /var/log/tunnel.log\nlog_level: ERROR\n");
        let config = load_configuration(&overrides(Some(file.path().to_path_buf()))).unwrap();
        assert_eq!(config.log_to, "stdout");
        assert_eq!(config.log_level, "DEBUG");
    }

    #[test]
    fn invalid_address_names_the_field() {
        let file = config_file("tunnel_addr: nowhere\n");
        let err = load_configuration(&overrides(Some(file.path().to_path_buf()))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("TunnelAddr"), "{msg}");
        assert!(msg.contains("nowhere"), "{msg}");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = config_file("http_addr: [unclosed\n");
        let err = load_configuration(&overrides(Some(file.path().to_path_buf()))).unwrap_err();
        assert!(matches!(err, ConfigError::ParseConfig { .. }));
    }

    #[test]
    fn address_defaults_only_fill_empty_fields() {
        let builder = ConfigurationBuilder::from_file(FileConfiguration {
            https_addr: "10.0.0.1:8443".to_string(),
            ..Default::default()
        })
        .apply_address_defaults();
        let config = builder.build(PathBuf::from(DEFAULT_PATH));
        assert_eq!(config.http_addr, DEFAULT_HTTP_ADDR);
        assert_eq!(config.https_addr, "10.0.0.1:8443");
        assert_eq!(config.tunnel_addr, DEFAULT_TUNNEL_ADDR);
    }

    #[test]
    fn overrides_touch_only_log_fields() {
        let file = FileConfiguration {
            hostname: "example.com".to_string(),
            log_to: "none".to_string(),
            log_level: "INFO".to_string(),
            ..Default::default()
        };
        let config = ConfigurationBuilder::from_file(file)
            .apply_overrides(&overrides(Some(PathBuf::from("/ignored"))))
            .build(PathBuf::from("/used.yml"));
        assert_eq!(config.hostname.as_deref(), Some("example.com"));
        assert_eq!(config.log_to, "stdout");
        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.http_addr, "");
        assert_eq!(config.config_path, PathBuf::from("/used.yml"));
    }
}
