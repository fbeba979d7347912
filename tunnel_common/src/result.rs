//! Result alias used by every fallible startup step in the workspace.
use crate::error::ConfigError;

/// `Result` defaulting its error to `ConfigError`.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
