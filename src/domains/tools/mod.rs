//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients; here
//! each one forwards its parameters to the UniFuncs API.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `ToolHandler` trait every tool implements
//! - `registry.rs` - Central tool registry and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `ToolRegistry::new`

pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use error::ToolError;
pub use handlers::ToolHandler;
pub use registry::ToolRegistry;
