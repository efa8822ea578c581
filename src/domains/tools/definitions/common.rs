//! Common utilities shared across tools.

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::warn;

use crate::domains::tools::ToolError;

/// Deserialize raw tool arguments into a typed parameter struct.
pub fn parse_arguments<P>(arguments: JsonObject) -> Result<P, ToolError>
where
    P: DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Deserialize an optional count that hosts may send as `10` or `10.0`.
///
/// Fractional, negative and out-of-range values are rejected.
pub fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "expected a whole number, got {}",
            value
        )));
    }
    Ok(Some(value as u32))
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}
