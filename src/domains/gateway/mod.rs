//! Gateway domain module.
//!
//! Outbound access to the UniFuncs HTTP API:
//!
//! - `client.rs` - Authenticated JSON POST client
//! - `envelope.rs` - `{code, message, data}` unwrapping
//! - `error.rs` - Gateway error types

mod client;
mod envelope;
mod error;

pub use client::GatewayClient;
pub use envelope::{Envelope, GatewayResponse};
pub use error::GatewayError;

/// Default base URL of the UniFuncs API.
pub const DEFAULT_API_BASE: &str = "https://api.unifuncs.com";
