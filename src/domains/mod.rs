//! Domains module containing business logic organized by bounded contexts.
//!
//! - **gateway**: Authenticated access to the UniFuncs HTTP API
//! - **tools**: MCP tools built on top of the gateway

pub mod gateway;
pub mod tools;
