//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, in a stable order
//! - Dispatch of tool calls by name, shared by every transport
//! - Conversion of tool failures into `isError` results

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{instrument, warn};

use super::definitions::common::error_result;
use super::definitions::{WebReaderTool, WebSearchTool};
use super::{ToolError, ToolHandler};
use crate::domains::gateway::GatewayClient;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Tools are registered once at construction and never change afterwards,
/// so listing is idempotent and order-stable.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a registry with every tool backed by `gateway`.
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self::with_tools(vec![
            Arc::new(WebSearchTool::new(gateway.clone())) as Arc<dyn ToolHandler>,
            Arc::new(WebReaderTool::new(gateway)),
        ])
    }

    /// Create a registry from an explicit list of tools.
    ///
    /// Later tools with an already registered name are ignored.
    pub fn with_tools(tools: Vec<Arc<dyn ToolHandler>>) -> Self {
        let mut unique: Vec<Arc<dyn ToolHandler>> = Vec::with_capacity(tools.len());
        for tool in tools {
            if unique.iter().any(|t| t.name() == tool.name()) {
                warn!("Duplicate tool name ignored: {}", tool.name());
                continue;
            }
            unique.push(tool);
        }
        Self { tools: unique }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.to_tool()).collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Never fails: unknown tools and handler errors come back as results
    /// with `isError` set.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        let Some(tool) = self.find(name) else {
            return error_result(&ToolError::not_found(name).to_string());
        };

        match tool.call(arguments).await {
            Ok(result) => result,
            Err(e) => error_result(&format!("Error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registry_for(base_url: &str) -> ToolRegistry {
        let gateway = GatewayClient::new(base_url, "test-key", Duration::from_secs(5)).unwrap();
        ToolRegistry::new(Arc::new(gateway))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry_for("http://localhost");
        assert_eq!(registry.tool_names(), vec!["web-search", "web-reader"]);
    }

    #[test]
    fn test_list_tools_is_stable() {
        let registry = registry_for("http://localhost");
        let first: Vec<_> = registry.list_tools().into_iter().map(|t| t.name).collect();
        let second: Vec<_> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_duplicate_names_are_dropped() {
        let gateway = Arc::new(
            GatewayClient::new("http://localhost", "k", Duration::from_secs(1)).unwrap(),
        );
        let registry = ToolRegistry::with_tools(vec![
            Arc::new(WebSearchTool::new(gateway.clone())) as Arc<dyn ToolHandler>,
            Arc::new(WebSearchTool::new(gateway)),
        ]);
        assert_eq!(registry.tool_names(), vec!["web-search"]);
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = registry_for("http://localhost");
        let result = registry
            .call_tool("nonexistent-tool", JsonObject::new())
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Unknown tool: nonexistent-tool");
    }

    #[tokio::test]
    async fn test_registry_call_invalid_arguments() {
        let registry = registry_for("http://localhost");
        let result = registry
            .call_tool("web-search", args(json!({ "query": "q", "page": 0 })))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Error: Invalid arguments"));
    }

    #[tokio::test]
    async fn test_registry_call_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/web-search/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 7,
                "message": "quota exceeded",
                "data": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry_for(&server.uri());
        let result = registry
            .call_tool("web-search", args(json!({ "query": "rust" })))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Error: quota exceeded");
    }

    #[tokio::test]
    async fn test_registry_call_success_is_unmodified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/web-reader/read"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("hello".as_bytes().to_vec(), "text/plain"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry_for(&server.uri());
        let result = registry
            .call_tool("web-reader", args(json!({ "url": "https://example.com" })))
            .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "hello");
    }
}
