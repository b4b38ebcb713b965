//! Configuration loading from TOML files and environment variables.

use crate::query::SymbolMatch;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Required setting is missing.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Record store configuration.
    pub store: StoreConfig,
    /// Query normalization configuration.
    pub query: QueryConfig,
    /// Response cache configuration.
    pub cache: CacheConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// MongoDB store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string. Required.
    pub uri: Option<String>,
    /// Database name.
    pub database: String,
    /// Collection holding prediction records.
    pub collection: String,
    /// Startup connect-and-ping deadline in seconds.
    pub connect_timeout_secs: u64,
    /// Per-request store deadline in seconds.
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    /// Startup deadline.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Per-request store deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: "StockThaiAnalysis".to_string(),
            collection: "predict".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 5,
        }
    }
}

/// Symbol filter strategies per endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Strategy for the `Symbol` parameter of the data endpoint.
    pub data_match: SymbolMatch,
    /// Strategy for the `query` parameter of the symbols endpoint.
    pub symbols_match: SymbolMatch,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            data_match: SymbolMatch::Exact,
            symbols_match: SymbolMatch::FullText,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether responses are cached.
    pub enabled: bool,
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
    /// Interval between expiry sweeps in seconds.
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    /// Entry lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 5 * 60,
            sweep_interval_secs: 10 * 60,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// Validation is deferred until environment overrides have been applied.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the process configuration.
    ///
    /// Reads the TOML file named by `CONFIG_PATH` when set, then applies
    /// environment overrides and validates the result.
    ///
    /// # Errors
    /// Returns error if the file is unreadable, an override is malformed, or a
    /// required setting (such as `MONGO_URI`) is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the process environment).
    ///
    /// # Errors
    /// Returns error if an override value cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT '{}' is not a port", port)))?;
        }
        if let Some(uri) = lookup("MONGO_URI").filter(|u| !u.is_empty()) {
            self.store.uri = Some(uri);
        }
        if let Some(database) = lookup("MONGO_DATABASE") {
            self.store.database = database;
        }
        if let Some(collection) = lookup("MONGO_COLLECTION") {
            self.store.collection = collection;
        }
        if let Some(mode) = lookup("DATA_SYMBOL_MATCH") {
            self.query.data_match = mode.parse().map_err(ConfigError::InvalidValue)?;
        }
        if let Some(mode) = lookup("SYMBOLS_SYMBOL_MATCH") {
            self.query.symbols_match = mode.parse().map_err(ConfigError::InvalidValue)?;
        }
        if let Some(enabled) = lookup("CACHE_ENABLED") {
            self.cache.enabled = match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "CACHE_ENABLED '{}' is not a boolean",
                        other
                    )));
                }
            };
        }
        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    /// Returns error if a required value is missing or a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.uri.as_deref() {
            None | Some("") => return Err(ConfigError::Missing("MONGO_URI")),
            Some(_) => {}
        }
        if self.store.database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "store database cannot be empty".to_string(),
            ));
        }
        if self.store.collection.is_empty() {
            return Err(ConfigError::InvalidValue(
                "store collection cannot be empty".to_string(),
            ));
        }
        if self.store.connect_timeout_secs == 0 || self.store.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "store timeouts must be positive".to_string(),
            ));
        }
        if self.cache.enabled && (self.cache.ttl_secs == 0 || self.cache.sweep_interval_secs == 0)
        {
            return Err(ConfigError::InvalidValue(
                "cache ttl and sweep interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
