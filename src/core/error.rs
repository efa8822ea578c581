//! Error types and handling for the MCP server.
//!
//! Only startup can fail the process: a missing credential, a gateway client
//! that cannot be built, or a transport that cannot start. Failures inside a
//! tool call never reach this type; the registry turns them into results.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the gateway client.
    #[error("Gateway error: {0}")]
    Gateway(#[from] crate::domains::gateway::GatewayError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
