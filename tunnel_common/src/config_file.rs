//! Reading an optional YAML configuration file.
//!
//! A missing file at the default location is not an error: the record's
//! defaults apply. A file the user asked for by path must be readable.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::result::Result;

/// Read and deserialize a configuration file.
///
/// The effective path is `explicit` when it is given and non-empty, otherwise
/// `default_path`. Returns the parsed record together with the effective path.
pub fn load_yaml<T>(explicit: Option<&Path>, default_path: &Path) -> Result<(T, PathBuf)>
where
    T: DeserializeOwned + Default,
{
    let explicit = explicit.filter(|p| !p.as_os_str().is_empty());
    let path = explicit.unwrap_or(default_path).to_path_buf();

    info!("Reading configuration file {}", path.display());
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) if explicit.is_some() => {
            return Err(ConfigError::ReadConfig { path, source });
        }
        Err(e) => {
            debug!("Optional configuration file {} not read: {}", path.display(), e);
            String::new()
        }
    };

    let record = parse_yaml(&content).map_err(|source| ConfigError::ParseConfig {
        path: path.clone(),
        source,
    })?;
    Ok((record, path))
}

/// Deserialize YAML content; a document with no values yields `T::default()`.
pub fn parse_yaml<T>(content: &str) -> std::result::Result<T, serde_yaml::Error>
where
    T: DeserializeOwned + Default,
{
    let has_values = content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#') && line != "---"
    });
    if !has_values {
        return Ok(T::default());
    }
    serde_yaml::from_str(content)
}
