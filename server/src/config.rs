//! Process configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: bind port (default: `3000`)
//! - `ASSETS_DIR`: directory of static files served at `/` (default: `./assets`)
//! - `STORAGE_MODE`: `memory` (default) | `file`
//! - `STORAGE_PATH`: JSON document used by `file` mode (default: `./data/todos.json`)
//! - `RUST_LOG`: log filter, read by the tracing subscriber in `main`

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid STORAGE_MODE '{0}' (expected 'memory' or 'file')")]
    InvalidStorageMode(String),

    #[error("invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Memory,
    File,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "memory" | "in_memory" | "inmemory" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            _ => Err(ConfigError::InvalidStorageMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub mode: StorageMode,
    /// Only read in [`StorageMode::File`].
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Memory,
            path: PathBuf::from("./data/todos.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: SocketAddr,
    pub assets_dir: PathBuf,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from `lookup`, which maps variable names to
    /// values. Unset and blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => 3000,
        };
        let address = format!("{host}:{port}");
        let address = address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(address))?;

        let mut store = StoreConfig::default();
        if let Some(mode) = var("STORAGE_MODE") {
            store.mode = mode.parse()?;
        }
        if let Some(path) = var("STORAGE_PATH") {
            store.path = PathBuf::from(path);
        }

        Ok(Self {
            address,
            assets_dir: var("ASSETS_DIR").map_or_else(|| PathBuf::from("./assets"), PathBuf::from),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.assets_dir, PathBuf::from("./assets"));
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ASSETS_DIR", "public"),
            ("STORAGE_MODE", "File"),
            ("STORAGE_PATH", "/var/lib/todos.json"),
        ])
        .unwrap();
        assert_eq!(config.address, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.assets_dir, PathBuf::from("public"));
        assert_eq!(config.store.mode, StorageMode::File);
        assert_eq!(config.store.path, PathBuf::from("/var/lib/todos.json"));
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        assert_eq!(config(&[("PORT", " ")]).unwrap().address.port(), 3000);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
        assert_eq!(
            config(&[("STORAGE_MODE", "mongo")]).unwrap_err(),
            ConfigError::InvalidStorageMode("mongo".to_string())
        );
        assert!(matches!(
            config(&[("HOST", "not a host")]).unwrap_err(),
            ConfigError::InvalidAddress(_)
        ));
    }
}
