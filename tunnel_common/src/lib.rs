//!
//! Common types and utilities shared by the tunnel server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `ConfigError` used across the workspace.
//! - `result` — handy `Result<T, ConfigError>` alias.
//! - `net` — address normalization into `host:port` form.
//! - `protocol` — tunnel protocol selector and its validator.
//! - `logging` — log level parsing and `env_logger` setup for a destination string.
//! - `config_file` — reading an optional YAML configuration file.
#![warn(missing_docs)]
pub mod config_file;
pub mod error;
pub mod logging;
pub mod net;
pub mod protocol;
pub mod result;

pub use error::ConfigError;
pub use net::normalize_address;
pub use protocol::{Protocol, validate_protocol};
pub use result::Result;
