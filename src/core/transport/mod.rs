//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **STDIO**: Standard input/output (default for MCP)
//! - **SSE**: HTTP server with a server-sent event stream per session and a
//!   message endpoint keyed by session id
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

pub mod sse;
pub mod stdio;

pub use config::{DEFAULT_SSE_PORT, SseConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
