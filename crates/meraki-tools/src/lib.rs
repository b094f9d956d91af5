//! MCP tool surface for the Meraki gateway.
//!
//! This crate turns the gateway into callable MCP tools:
//!
//! - [`ToolDefinition`] / [`ToolInfo`] -- the trait every tool implements
//!   and the listing summary.
//! - [`ToolRegistry`] -- thread-safe tool storage and lookup.
//! - [`McpServer`] -- JSON-RPC 2.0 stdio server routing `tools/list` and
//!   `tools/call`.
//! - [`api_tools`] -- the dynamic discovery/execution tools backed by the
//!   policy gateway.
//! - [`common_tools`] -- fixed convenience wrappers for popular endpoints
//!   (thin passthroughs, no policy logic).

pub mod api_tools;
pub mod common_tools;
pub mod definition;
pub mod mcp_server;
pub mod registry;

pub use api_tools::register_api_tools;
pub use common_tools::register_common_tools;
pub use definition::{ToolDefinition, ToolInfo, ToolOutput};
pub use mcp_server::McpServer;
pub use registry::ToolRegistry;
