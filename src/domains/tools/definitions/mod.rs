//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod web_reader;
pub mod web_search;

pub use web_reader::{ReaderFormat, WebReaderParams, WebReaderTool};
pub use web_search::{Freshness, SearchFormat, WebSearchParams, WebSearchTool};
