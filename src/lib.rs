//! Code Operation MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing precise file-editing
//! tools: windowed reading, file creation, line-level replacement, and
//! search. Lua files written through the server are syntax-checked with
//! tree-sitter.

pub mod config;
pub mod error;
pub mod fsops;
pub mod mcp;
pub mod syntax;

pub use config::Config;
pub use error::{CodeOpsError, Result};
