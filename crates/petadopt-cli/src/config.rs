//! Configuration for the petadopt CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use petadopt_registry::DEFAULT_LOCK_TIMEOUT_MS;

pub const DEFAULT_CONFIG_PATH: &str = "petadopt.toml";
pub const DEFAULT_STORE_PATH: &str = ".petadopt/registry.jsonl";
pub const DEFAULT_LOG_FILTER: &str = "petadopt=warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSONL snapshot holding every registry record
    pub store_path: PathBuf,

    /// How long a mutation waits for another process's store lock
    pub lock_timeout_ms: u64,

    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// An explicit path must exist; the default path is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
