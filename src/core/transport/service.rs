//! Transport service - selects and runs the configured transport.

use tracing::info;

use super::sse::SseTransport;
use super::stdio::StdioTransport;
use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Start the transport with the given MCP server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            TransportConfig::Stdio => StdioTransport::run(server).await,
            TransportConfig::Sse(cfg) => SseTransport::new(cfg).run(server).await,
        }
    }
}
