//! infracost-mcp: MCP Protocol Server for Infracost
//!
//! stdin → JSON-RPC → [`McpServer`] → [`infracost_tools::ToolDispatcher`] → stdout
//!
//! Methods:
//! - initialize → handshake
//! - ping → `{}`
//! - tools/list → every registered tool with its input schema
//! - tools/call → validated dispatch to the CLI or the cloud API
//! - notifications/* → no response

pub mod protocol;
pub mod server;
pub mod transport;

// Re-export main types
pub use protocol::{JsonRpcError, McpRequest, McpResponse};
pub use server::{McpServer, McpServerConfig, PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
