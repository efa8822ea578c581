//! Response envelope handling.
//!
//! The remote API wraps JSON answers as `{code, message, data}`, where
//! `code == 0` means success. Non-JSON answers are passed through as text.

use serde::Deserialize;
use serde_json::Value;

use super::error::GatewayError;

/// The `{code, message, data}` wrapper around every JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: i64,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Unwrap the envelope into its payload, or fail with the API message.
    pub fn into_data(self) -> Result<Value, GatewayError> {
        if self.code != 0 {
            return Err(GatewayError::api(
                self.code,
                self.message.unwrap_or_default(),
            ));
        }
        Ok(self.data)
    }
}

/// A successfully unwrapped gateway response.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// `data` from a JSON envelope with `code == 0`.
    Json(Value),

    /// Raw body of a non-JSON response.
    Text(String),
}

impl GatewayResponse {
    /// Unwrap a response body according to its declared content type.
    pub fn from_body(content_type: Option<&str>, body: String) -> Result<Self, GatewayError> {
        if content_type.is_some_and(is_json_content_type) {
            let envelope: Envelope = serde_json::from_str(&body)?;
            return envelope.into_data().map(Self::Json);
        }
        Ok(Self::Text(body))
    }

    /// Render the response as JSON text, quoting raw text as a JSON string.
    pub fn to_json_string(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => Value::String(text.clone()).to_string(),
        }
    }

    /// Render the response as text. Strings are returned verbatim,
    /// anything else is serialized to JSON.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Json(Value::String(text)) => text,
            Self::Json(value) => value.to_string(),
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}
