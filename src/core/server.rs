//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool listing and tool calls to the
//! [`ToolRegistry`]. Both transports go through the same registry, so a
//! call behaves identically over STDIO and SSE.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::{gateway::GatewayClient, tools::ToolRegistry};

const INSTRUCTIONS: &str = "Use web-search to find pages on the internet by keywords, \
    and web-reader to fetch the content of a page by URL.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry dispatching tool calls.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// The gateway client is built here, once, from the configured API key.
    pub fn new(config: Config) -> Result<Self> {
        let gateway = Arc::new(GatewayClient::from_config(&config)?);
        let registry = Arc::new(ToolRegistry::new(gateway));

        Ok(Self {
            config: Arc::new(config),
            registry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Usage instructions reported to clients.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    /// Call a tool by name. Failures are reported inside the result.
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        self.registry.call_tool(name, arguments).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let arguments = request.arguments.unwrap_or_default();
        Ok(self.registry.call_tool(&request.name, arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_identity() {
        let server = McpServer::new(Config::new("test-key")).unwrap();
        assert_eq!(server.name(), "mcp-server/unifuncs");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_get_info_enables_tools_only() {
        let server = McpServer::new(Config::new("test-key")).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = McpServer::new(Config::new("test-key")).unwrap();
        let result = server.call_tool("nonexistent-tool", JsonObject::new()).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_list_tools_matches_registry_order() {
        let server = McpServer::new(Config::new("test-key")).unwrap();
        let names: Vec<_> = server.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["web-search", "web-reader"]);
    }
}
