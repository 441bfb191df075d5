//! Configuration module for the media asset server.
//!
//! This module handles loading and validating configuration from TOML files.
//! Every value is passed explicitly into [`crate::AppState`], so nothing in the
//! server depends on process-wide constants.
//!
//! # Configuration Sources (in order of priority)
//! 1. `$MEDIA_SERVER_CONFIG` - Explicit path
//! 2. `config.local.toml` - Local overrides (gitignored)
//! 3. `config.toml` - Main configuration file
//!
//! Missing fields fall back to their defaults.
//!
//! # Example
//! ```rust,ignore
//! let config = Config::load("config.toml")?;
//! println!("Server will listen on {}:{}", config.server.host, config.server.port);
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding an explicit configuration path
pub const CONFIG_PATH_ENV: &str = "MEDIA_SERVER_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// The single origin allowed to make cross-origin requests
    pub cors_origin: String,
    /// Maximum request body size in bytes (applies to uploads)
    pub max_upload_size: usize,
    /// Cache-Control max-age in seconds for statically served files
    pub cache_max_age: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: "http://localhost:4200".to_string(),
            max_upload_size: 500 * 1024 * 1024,
            cache_max_age: 0,
        }
    }
}

impl ServerConfig {
    /// Address string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding image files
    pub images_dir: PathBuf,
    /// Directory holding video files
    pub videos_dir: PathBuf,
    /// Create missing directories at startup
    pub create_dirs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("src/images"),
            videos_dir: PathBuf::from("src/videos"),
            create_dirs: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Tries, in order:
    /// 1. the path in `$MEDIA_SERVER_CONFIG`
    /// 2. `config.local.toml`
    /// 3. `config.toml`
    ///
    /// # Errors
    /// Returns `ConfigError` if no configuration file is found
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(path);
        }

        if Path::new("config.local.toml").exists() {
            return Self::load("config.local.toml");
        }

        if Path::new("config.toml").exists() {
            return Self::load("config.toml");
        }

        Err(ConfigError::ValidationError(format!(
            "No configuration file found. Expected config.toml, config.local.toml or ${}",
            CONFIG_PATH_ENV
        )))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "port must be greater than 0".to_string(),
            ));
        }

        if self.server.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_upload_size must be greater than 0".to_string(),
            ));
        }

        validate_origin(&self.server.cors_origin)?;

        if self.storage.images_dir == self.storage.videos_dir {
            return Err(ConfigError::ValidationError(
                "images_dir and videos_dir must be different directories".to_string(),
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging format must be one of: {:?}",
                valid_formats
            )));
        }

        Ok(())
    }
}

/// An origin is scheme and authority only: `http://host[:port]`
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let rest = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "cors_origin must start with http:// or https://, got {:?}",
                origin
            ))
        })?;

    if rest.is_empty() || rest.contains('/') || rest.chars().any(char::is_whitespace) {
        return Err(ConfigError::ValidationError(format!(
            "cors_origin must be a bare origin without path or trailing slash, got {:?}",
            origin
        )));
    }

    Ok(())
}
