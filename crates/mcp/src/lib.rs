// MCP (Model Context Protocol) tool server for the Precisely location APIs.
// Exposes geocoding, data graph, tax, emergency, identity and time zone tools
// to agent clients over JSON-RPC.

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{ConfigError, McpConfig};
pub use server::McpServer;
pub use tools::{build_registry, Tool, ToolRegistry};
