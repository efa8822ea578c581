//! STDIO transport implementation.
//!
//! Standard input/output transport driven by the rmcp service loop.
//! Logs go to stderr so stdout stays a clean protocol channel.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let name = server.name().to_string();

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        info!("{} running on stdio", name);

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
