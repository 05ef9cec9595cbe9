//! Infracost MCP Server
//!
//! Protocol logic only. Tool semantics live in
//! [`infracost_tools::ToolDispatcher`]; this maps its results and errors onto
//! JSON-RPC.

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use infracost_tools::{DispatchError, ToolDispatcher};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "infracost-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Default)]
pub struct McpServerConfig {
    /// Server name override
    pub name: Option<String>,
}

pub struct McpServer {
    config: McpServerConfig,
    dispatcher: Arc<ToolDispatcher>,
}

impl McpServer {
    pub fn new(config: McpServerConfig, dispatcher: ToolDispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Handle one message; notifications yield `None`
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        debug!(method = %request.method, "Handling MCP request");
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.dispatcher.list_tools() })),
            "tools/call" => self.handle_tools_call(request.params).await,
            other => Err(JsonRpcError::method_not_found(format!(
                "Method not found: {}",
                other
            ))),
        };
        Some(McpResponse::reply(request.id, outcome))
    }

    fn handle_initialize(&self, params: Option<&Value>) -> Value {
        let client_name = params
            .and_then(|p| p.get("clientInfo"))
            .and_then(|ci| ci.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        info!(client = %client_name, "Client connected");

        let server_name = self.config.name.as_deref().unwrap_or(SERVER_NAME);
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": server_name,
                "version": SERVER_VERSION
            }
        })
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.unwrap_or(Value::Null);
        let tool_name = params
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        match self.dispatcher.call(tool_name, arguments).await {
            Ok(response) => serde_json::to_value(&response)
                .map_err(|e| JsonRpcError::internal_error(e.to_string())),
            Err(err) => {
                warn!(tool = %tool_name, error = %err, "Tool call failed");
                Err(rpc_error(&err))
            }
        }
    }
}

/// JSON-RPC form of a dispatch failure
pub fn rpc_error(err: &DispatchError) -> JsonRpcError {
    let base = match err {
        DispatchError::UnknownTool(_) => JsonRpcError::method_not_found(err.to_string()),
        DispatchError::InvalidArguments(_) => JsonRpcError::invalid_params(err.to_string()),
        DispatchError::Failed(_) => JsonRpcError::internal_error(err.to_string()),
    };
    base.with_data(err.data())
}
