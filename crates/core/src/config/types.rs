use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::media::HttpSourceConfig;
use crate::polling::PollingConfig;
use crate::storage::DEFAULT_STORAGE_PREFIX;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: HttpSourceConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where the watch list is persisted.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit.
    Memory,
    #[default]
    Sqlite,
}

/// Key/value storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite database file (sqlite backend only)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Prefix applied to every stored key
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            prefix: default_prefix(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("medialist.db")
}

fn default_prefix() -> String {
    DEFAULT_STORAGE_PREFIX.to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub polling: PollingConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

/// Catalog API config with the token hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub url: String,
    pub token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                url: config.api.url.clone(),
                token_configured: config.api.token.is_some(),
                timeout_secs: config.api.timeout_secs,
            },
            polling: config.polling.clone(),
            storage: config.storage.clone(),
            server: config.server.clone(),
        }
    }
}
