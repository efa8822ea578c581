//! UniFuncs MCP Server Library
//!
//! Exposes the UniFuncs web search and web reader APIs as Model Context
//! Protocol tools.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP server handler and the
//!   STDIO/SSE transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **gateway**: HTTP client and `{code, message, data}` envelope handling
//!   - **tools**: `web-search` and `web-reader`, plus the registry that
//!     dispatches calls to them
//!
//! # Example
//!
//! ```rust,no_run
//! use unifuncs_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
