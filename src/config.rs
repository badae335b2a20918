//! Configuration management for the RAX file gateway
//!
//! Settings come from built-in defaults, an optional `config.toml`, and
//! `RAX_GATEWAY_*` environment overrides, in increasing precedence. All of
//! them are read once at startup.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "RAX_GATEWAY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "RAX_GATEWAY";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// HTTP listening port
    pub port: u16,

    /// Directory every file operation is confined to
    pub server_root: String,

    /// Upper bound for a single filesystem operation
    pub operation_timeout_secs: u64,

    /// Largest accepted request body, in bytes
    pub max_content_bytes: usize,
}

impl ServerConfig {
    /// Load configuration, reading the file named by `RAX_GATEWAY_CONFIG`
    /// (or `config.toml` in the working directory) when present.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let required = path != DEFAULT_CONFIG_PATH;
        Self::load_from(&path, required)
    }

    /// Load configuration from `path` with environment overrides.
    pub fn load_from(path: &str, required: bool) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 4000)?
            .set_default("server_root", "./server_root")?
            .set_default("operation_timeout_secs", 30)?
            .set_default("max_content_bytes", 10 * 1024 * 1024)?
            .add_source(File::with_name(path).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.server_root.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        if self.operation_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "operation_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.max_content_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_content_bytes must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Get operation timeout as Duration
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}
