//! Remote host configuration.
//!
//! The remote config names the SSH host packages are published to.
//! When no config file exists, the settings fall back to `PM_SSH_*`
//! environment variables so the tool works out of the box on CI hosts.

use parcel_core::error::ParcelError;
use serde::Deserialize;
use std::path::Path;

use crate::ConfigResult;

/// Connection settings for the package host
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub key_path: String,
    #[serde(default = "default_remote_dir")]
    pub remote_dir: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    22
}

fn default_remote_dir() -> String {
    "/var/packages".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl RemoteConfig {
    /// Load the remote config from a JSON file, or build one from
    /// environment variables when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::from_env());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| ParcelError::io(format!("Failed to read {}", path.display()), e))?;

        serde_json::from_str(&data).map_err(|e| ParcelError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Build a config from `PM_SSH_*` environment variables
    pub fn from_env() -> Self {
        Self {
            host: env_or_default("PM_SSH_HOST", "localhost"),
            port: default_port(),
            username: env_or_default("PM_SSH_USER", "user"),
            key_path: env_or_default("PM_SSH_KEY", "~/.ssh/id_rsa"),
            remote_dir: env_or_default("PM_SSH_REMOTE_DIR", "/var/packages"),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
