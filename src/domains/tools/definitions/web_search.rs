//! Web search tool.
//!
//! Forwards a keyword query to the UniFuncs search endpoint and returns the
//! result list as JSON text. Results are passed through without inspection.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::{deserialize_whole_number, parse_arguments, success_result};
use crate::domains::gateway::GatewayClient;
use crate::domains::tools::{ToolError, ToolHandler};

/// Maximum number of results per page accepted by the API.
pub const MAX_COUNT: u32 = 50;

/// Time window for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Freshness {
    Day,
    Week,
    Month,
    Year,
}

/// Output format of the search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchFormat {
    Markdown,
    Text,
    Json,
}

// Serializes back to exactly the accepted input: unknown keys are dropped
// and absent options are omitted.

/// Search the internet by keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// The search phrase.
    #[schemars(description = "Search keywords")]
    pub query: String,

    #[schemars(description = "Only return results published within this window")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Freshness>,

    #[schemars(description = "Result page, starting at 1", range(min = 1))]
    #[schemars(with = "Option<u32>")]
    #[serde(
        default,
        deserialize_with = "deserialize_whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<u32>,

    #[schemars(description = "Results per page (1-50)", range(min = 1, max = 50))]
    #[schemars(with = "Option<u32>")]
    #[serde(
        default,
        deserialize_with = "deserialize_whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,

    #[schemars(description = "Output format of the results")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SearchFormat>,
}

impl WebSearchParams {
    /// Check the numeric ranges the schema declares.
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.page == Some(0) {
            return Err(ToolError::invalid_arguments("page must be at least 1"));
        }
        if let Some(count) = self.count {
            if !(1..=MAX_COUNT).contains(&count) {
                return Err(ToolError::invalid_arguments(format!(
                    "count must be between 1 and {}",
                    MAX_COUNT
                )));
            }
        }
        Ok(())
    }
}

/// Web Search Tool implementation.
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    gateway: Arc<GatewayClient>,
}

impl WebSearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "web-search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Search the internet by keywords and return a list of matching pages.";

    /// Remote endpoint path.
    pub const PATH: &'static str = "/api/web-search/search";

    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Execute the search with already validated parameters.
    pub async fn execute(&self, params: &WebSearchParams) -> Result<CallToolResult, ToolError> {
        debug!("Searching the web for: {}", params.query);

        let response = self.gateway.post(Self::PATH, params).await?;
        Ok(success_result(response.to_json_string()))
    }
}

#[async_trait::async_trait]
impl ToolHandler for WebSearchTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool::new(
            Self::NAME,
            Self::DESCRIPTION,
            cached_schema_for_type::<WebSearchParams>(),
        )
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: WebSearchParams = parse_arguments(arguments)?;
        params.validate()?;
        self.execute(&params).await
    }
}
