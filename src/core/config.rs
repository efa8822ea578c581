//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (a `.env` file is honored by the binary) and
//! defaults. The API key is the only mandatory setting.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::gateway::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable holding the UniFuncs API key.
pub const API_KEY_VAR: &str = "UNIFUNCS_API_KEY";

/// Environment variable overriding the UniFuncs API base URL.
pub const API_BASE_VAR: &str = "UNIFUNCS_API_BASE";

/// Environment variable overriding the outbound request timeout (seconds).
pub const TIMEOUT_VAR: &str = "UNIFUNCS_TIMEOUT_SECS";

/// Default outbound request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Remote API endpoint configuration.
    pub gateway: GatewayConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Remote API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every tool path is joined onto.
    pub base_url: String,

    /// Timeout applied to each outbound request, in seconds.
    pub timeout_secs: u64,
}

/// Configuration for external API credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Bearer token for the UniFuncs API.
    pub api_key: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "mcp-server/unifuncs".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.level = level;
        }
        config
    }
}

impl GatewayConfig {
    /// Load the base URL and timeout overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(API_BASE_VAR) {
            if !base_url.trim().is_empty() {
                info!("Using API base URL {}", base_url);
                config.base_url = base_url;
            }
        }

        if let Ok(timeout) = std::env::var(TIMEOUT_VAR) {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid {}={:?}, using {}s",
                    TIMEOUT_VAR, timeout, DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        config
    }
}

impl Config {
    /// Create a configuration with default values and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            gateway: GatewayConfig::default(),
            credentials: CredentialsConfig {
                api_key: api_key.into(),
            },
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Fails with [`Error::Config`] when `UNIFUNCS_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{} environment variable is not set", API_KEY_VAR)))?;

        let mut config = Self::new(api_key);

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.gateway = GatewayConfig::from_env();
        config.transport = TransportConfig::from_env();

        Ok(config)
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
