//! Web reader tool.
//!
//! Fetches the content of a single page through the UniFuncs reader endpoint.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::{parse_arguments, success_result};
use crate::domains::gateway::GatewayClient;
use crate::domains::tools::{ToolError, ToolHandler};

/// Output format of the extracted page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReaderFormat {
    Markdown,
}

/// Parameters for reading a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebReaderParams {
    #[schemars(description = "URL of the page to read")]
    pub url: String,

    #[schemars(description = "Output format of the page content")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ReaderFormat>,

    #[schemars(description = "Keep images in the extracted content")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,

    #[schemars(description = "Append a summary of the links found on the page")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_summary: Option<bool>,
}

/// Web Reader Tool implementation.
#[derive(Debug, Clone)]
pub struct WebReaderTool {
    gateway: Arc<GatewayClient>,
}

impl WebReaderTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "web-reader";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch the detailed content of the page at the given URL.";

    /// Remote endpoint path.
    pub const PATH: &'static str = "/api/web-reader/read";

    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Read the page. Text payloads are returned verbatim.
    pub async fn execute(&self, params: &WebReaderParams) -> Result<CallToolResult, ToolError> {
        debug!("Reading page: {}", params.url);

        let response = self.gateway.post(Self::PATH, params).await?;
        Ok(success_result(response.into_text()))
    }
}

#[async_trait::async_trait]
impl ToolHandler for WebReaderTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool::new(
            Self::NAME,
            Self::DESCRIPTION,
            cached_schema_for_type::<WebReaderParams>(),
        )
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: WebReaderParams = parse_arguments(arguments)?;
        self.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer) -> WebReaderTool {
        let gateway = GatewayClient::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap();
        WebReaderTool::new(Arc::new(gateway))
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
    fn test_params_use_camel_case() {
        let params: WebReaderParams = serde_json::from_value(json!({
            "url": "https://example.com",
            "includeImages": true,
            "linkSummary": false
        }))
        .unwrap();
        assert_eq!(params.include_images, Some(true));
        assert_eq!(params.link_summary, Some(false));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "url": "https://example.com",
                "includeImages": true,
                "linkSummary": false
            })
        );
    }

    #[test]
    fn test_params_reject_unsupported_format() {
        let result = serde_json::from_value::<WebReaderParams>(json!({
            "url": "https://example.com",
            "format": "html"
        }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_plain_text_is_verbatim() {
        let server = MockServer::start().await;
        let page = "# Example\n\n\"quoted\" text with {braces}";

        Mock::given(method("POST"))
            .and(path("/api/web-reader/read"))
            .and(body_json(json!({ "url": "https://example.com", "format": "markdown" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(page.as_bytes().to_vec(), "text/markdown"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = tool_for(&server)
            .call(args(json!({ "url": "https://example.com", "format": "markdown" })))
            .await
            .unwrap();

        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), page);
    }

    #[tokio::test]
    async fn test_read_json_string_data_is_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/web-reader/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "",
                "data": "page body"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = tool_for(&server)
            .call(args(json!({ "url": "https://example.com" })))
            .await
            .unwrap();

        assert_eq!(text_of(&result), "page body");
    }

    #[tokio::test]
    async fn test_read_json_object_is_serialized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/web-reader/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "",
                "data": { "title": "Example" }
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server)
            .call(args(json!({ "url": "https://example.com" })))
            .await
            .unwrap();

        assert_eq!(text_of(&result), r#"{"title":"Example"}"#);
    }

    #[tokio::test]
    async fn test_read_missing_url() {
        let server = MockServer::start().await;

        let err = tool_for(&server).call(JsonObject::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
