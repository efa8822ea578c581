//! Gateway-specific error types.

use thiserror::Error;

/// Errors produced while talking to the remote API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The envelope carried a non-zero `code`; the message is kept verbatim.
    #[error("{message}")]
    Api { code: i64, message: String },

    /// The request could not be sent or the body could not be read.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The body claimed to be JSON but was not a valid envelope.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// Create a new API error from an envelope.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }
}
