// crates/appt-analytics-server/src/config.rs
// ============================================================================
// Module: Server Configuration
// Description: TOML-backed configuration with safe defaults and validation.
// Purpose: Resolve bind address and request limits before startup.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is read from `appt-analytics.toml` (or an explicit path, or
//! the `APPT_ANALYTICS_CONFIG` override). A missing default file falls back
//! to built-in defaults; an explicitly named file must exist. Validation
//! checks the bind address parses and limits are non-zero before the server
//! starts.
//!
//! Security posture: config files are operator-trusted but still validated;
//! unknown fields are rejected to surface typos.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default config file name resolved from the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "appt-analytics.toml";
/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "APPT_ANALYTICS_CONFIG";
/// Default loopback bind address for the data endpoint.
pub const DEFAULT_BIND: &str = "127.0.0.1:8370";
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while loading or validating configuration.
///
/// # Invariants
/// - Messages are safe for operator display.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config at {path}: {error}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error text.
        error: String,
    },
    /// The config file could not be parsed as TOML.
    #[error("failed to parse config at {path}: {error}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying parse error text.
        error: String,
    },
    /// The config content failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Server section of the application config.
///
/// # Invariants
/// - `bind` must parse as a socket address during validation.
/// - `max_request_bytes` is a hard upper bound, always >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

/// Top-level application config.
///
/// # Invariants
/// - Unknown sections are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads config from an explicit path, the env override, or the default
    /// file, falling back to built-in defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicitly named file is missing or
    /// unreadable, when parsing fails, or when validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = path {
            Self::from_file(path)?
        } else {
            let fallback =
                env_config_path().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            if fallback.exists() {
                Self::from_file(&fallback)?
            } else {
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses config from a specific file.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            error: err.to_string(),
        })?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            error: err.to_string(),
        })
    }

    /// Validates the config content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the bind address does not parse
    /// or the request size limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.server.max_request_bytes == 0 {
            return Err(ConfigError::Invalid("max_request_bytes must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|err| {
            ConfigError::Invalid(format!("bind address {} does not parse: {err}", self.server.bind))
        })
    }
}

/// Resolves a config path from the `APPT_ANALYTICS_CONFIG` override.
fn env_config_path() -> Option<PathBuf> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
