//! Transport Layer
//!
//! Newline-delimited JSON-RPC over stdio.

mod stdio;

pub use stdio::{serve_io, StdioTransport};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Anything that can answer MCP requests
#[async_trait::async_trait]
pub trait McpHandler: Send + Sync {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse>;
}

/// Transport trait - implement for new transport types
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Serve requests using this transport
    async fn serve<H: McpHandler + 'static>(self, handler: Arc<H>) -> Result<()>;
}

#[async_trait::async_trait]
impl McpHandler for crate::McpServer {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        crate::McpServer::handle_request(self, request).await
    }
}

/// Decode one raw message and hand it to `handler`
pub async fn handle_message<H: McpHandler + ?Sized>(handler: &H, raw: &str) -> Option<McpResponse> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "Parse error");
            return Some(McpResponse::reply(
                None,
                Err(JsonRpcError::parse_error(format!("Parse error: {}", e))),
            ));
        }
    };

    let id = value.get("id").cloned().filter(|id| !id.is_null());
    match serde_json::from_value::<McpRequest>(value) {
        Ok(request) => handler.handle_request(request).await,
        Err(e) => Some(McpResponse::reply(
            id,
            Err(JsonRpcError::invalid_request(format!("Invalid request: {}", e))),
        )),
    }
}
