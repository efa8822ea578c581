//! Tool handler trait.
//!
//! Every tool exposed by the server implements [`ToolHandler`]. The registry
//! keeps them as trait objects and dispatches calls by name.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::error::ToolError;

/// A named, schema-described tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the name of this tool.
    fn name(&self) -> &'static str;

    /// Get the tool metadata (name, description, input schema).
    fn to_tool(&self) -> Tool;

    /// Validate the arguments and execute the tool.
    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError>;
}
