//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable selecting the SSE transport when non-empty.
pub const SSE_SERVER_VAR: &str = "UNIFUNCS_SSE_SERVER";

/// Environment variable overriding the SSE port.
pub const SSE_PORT_VAR: &str = "UNIFUNCS_SSE_SERVER_PORT";

/// Environment variable overriding the SSE bind host.
pub const SSE_HOST_VAR: &str = "UNIFUNCS_SSE_SERVER_HOST";

/// Default SSE port.
pub const DEFAULT_SSE_PORT: u16 = 5656;

/// Transport configuration options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[default]
    Stdio,

    /// HTTP server with an SSE stream per session.
    Sse(SseConfig),
}

/// SSE transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path clients open the event stream on.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path clients post JSON-RPC messages to.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_sse_path() -> String {
    "/sse".to_string()
}

fn default_message_path() -> String {
    "/messages".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSE_PORT,
            host: default_host(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            enable_cors: default_cors(),
        }
    }
}

impl SseConfig {
    /// Load SSE settings from environment variables.
    pub fn from_env() -> Self {
        let port = match std::env::var(SSE_PORT_VAR) {
            Ok(value) => value.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    SSE_PORT_VAR, value, DEFAULT_SSE_PORT
                );
                DEFAULT_SSE_PORT
            }),
            Err(_) => DEFAULT_SSE_PORT,
        };
        let host = std::env::var(SSE_HOST_VAR).unwrap_or_else(|_| default_host());

        Self {
            port,
            host,
            ..Default::default()
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an SSE transport config.
    pub fn sse(port: u16, host: impl Into<String>) -> Self {
        Self::Sse(SseConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// Any non-empty `UNIFUNCS_SSE_SERVER` selects the SSE transport.
    pub fn from_env() -> Self {
        let sse_requested = std::env::var(SSE_SERVER_VAR)
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        if sse_requested {
            Self::Sse(SseConfig::from_env())
        } else {
            Self::Stdio
        }
    }

    /// Pick the transport from the `--sse` flag and the environment.
    ///
    /// The flag forces SSE; without it the environment decides. Port and
    /// host always come from the environment.
    pub fn resolve(sse_flag: bool) -> Self {
        if sse_flag {
            Self::Sse(SseConfig::from_env())
        } else {
            Self::from_env()
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Sse(cfg) => format!("SSE on http://{}:{}{}", cfg.host, cfg.port, cfg.sse_path),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}
