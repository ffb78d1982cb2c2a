//! Configuration module for msgboard.

use serde::Deserialize;
use std::path::Path;

use crate::{MsgboardError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Empty means in-memory.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum pooled connections for a file-backed database.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Fall back to an in-memory database when the file cannot be opened.
    #[serde(default = "default_fallback_to_memory")]
    pub fallback_to_memory: bool,
    /// Attempts for a thread read-modify-write whose version check keeps failing.
    #[serde(default = "default_max_update_attempts")]
    pub max_update_attempts: u32,
}

fn default_db_path() -> String {
    "data/msgboard.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_fallback_to_memory() -> bool {
    true
}

fn default_max_update_attempts() -> u32 {
    8
}

impl DatabaseConfig {
    /// Whether this configuration asks for an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        let path = self.path.trim();
        path.is_empty() || path == ":memory:"
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            fallback_to_memory: default_fallback_to_memory(),
            max_update_attempts: default_max_update_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console output is always enabled.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve static files under `/public`.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MsgboardError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MsgboardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listen port
    /// - `MSGBOARD_DATABASE_PATH`: database file (empty string for in-memory)
    /// - `MSGBOARD_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring unparseable PORT"),
            }
        }

        if let Ok(path) = std::env::var("MSGBOARD_DATABASE_PATH") {
            self.database.path = path;
        }

        if let Ok(level) = std::env::var("MSGBOARD_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.max_update_attempts == 0 {
            return Err(MsgboardError::Config(
                "database.max_update_attempts must be at least 1".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(MsgboardError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
