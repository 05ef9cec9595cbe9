//! Protocol handling end to end, without a real CLI or cloud token

use infracost_core::InfracostConfig;
use infracost_mcp::transport::{handle_message, serve_io};
use infracost_mcp::{McpServer, McpServerConfig, PROTOCOL_VERSION, SERVER_NAME};
use infracost_tools::{InfracostCli, ToolDispatcher};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn server() -> McpServer {
    let dispatcher = ToolDispatcher::new(
        InfracostConfig::default(),
        Arc::new(InfracostCli::new("/nonexistent/infracost-for-tests")),
        None,
    );
    McpServer::new(McpServerConfig::default(), dispatcher)
}

async fn roundtrip(server: &McpServer, message: Value) -> Value {
    let response = handle_message(server, &message.to_string())
        .await
        .expect("expected a response");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let resp = roundtrip(
        &server(),
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {"protocolVersion": PROTOCOL_VERSION, "clientInfo": {"name": "test"}}
        }),
    )
    .await;

    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    assert!(resp["result"]["capabilities"].get("tools").is_some());
}

#[tokio::test]
async fn notifications_get_no_response() {
    let server = server();
    let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    assert!(handle_message(&server, &initialized.to_string()).await.is_none());

    let no_id = json!({"jsonrpc": "2.0", "method": "tools/list"});
    assert!(handle_message(&server, &no_id.to_string()).await.is_none());
}

#[tokio::test]
async fn tools_list_advertises_every_tool() {
    let resp = roundtrip(
        &server(),
        json!({"jsonrpc": "2.0", "id": "list", "method": "tools/list"}),
    )
    .await;

    let tools = resp["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 16);
    assert_eq!(tools[0]["name"], "infracost_breakdown");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["path"]));
}

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let resp = roundtrip(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": {"name": "infracost_estimate_everything", "arguments": {}}
        }),
    )
    .await;

    assert_eq!(resp["error"]["code"], -32601);
    assert_eq!(resp["error"]["message"], "Unknown tool: infracost_estimate_everything");
}

#[tokio::test]
async fn invalid_arguments_are_invalid_params() {
    let resp = roundtrip(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": {"name": "infracost_diff", "arguments": {"path": "/infra"}}
        }),
    )
    .await;

    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["data"]["issues"][0]["path"], "compareTo");
}

#[tokio::test]
async fn missing_tool_name_is_invalid_params() {
    let resp = roundtrip(
        &server(),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {}}),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn cloud_tool_without_token_is_internal_configuration_error() {
    let resp = roundtrip(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "infracost_cloud_list_guardrails", "arguments": {"orgSlug": "acme"}}
        }),
    )
    .await;

    assert_eq!(resp["error"]["code"], -32603);
    assert_eq!(
        resp["error"]["message"],
        "INFRACOST_SERVICE_TOKEN is not configured for Infracost Cloud API operations"
    );
    assert_eq!(resp["error"]["data"]["kind"], "configuration");
}

#[tokio::test]
async fn missing_cli_is_internal_error_with_install_hint() {
    let resp = roundtrip(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "infracost_breakdown", "arguments": {"path": "/infra", "format": "json"}}
        }),
    )
    .await;

    assert_eq!(resp["error"]["code"], -32603);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("https://www.infracost.io/docs/"));
    assert_eq!(resp["error"]["data"]["kind"], "backend_unavailable");
}

#[tokio::test]
async fn malformed_and_unknown_messages() {
    let server = server();

    let parse = handle_message(&server, "{not json").await.unwrap();
    let parse = serde_json::to_value(parse).unwrap();
    assert_eq!(parse["error"]["code"], -32700);
    assert_eq!(parse["id"], Value::Null);

    let invalid = handle_message(&server, r#"{"id": 9, "method": 12}"#).await.unwrap();
    let invalid = serde_json::to_value(invalid).unwrap();
    assert_eq!(invalid["error"]["code"], -32600);
    assert_eq!(invalid["id"], 9);

    let unknown = roundtrip(
        &server,
        json!({"jsonrpc": "2.0", "id": 10, "method": "resources/list"}),
    )
    .await;
    assert_eq!(unknown["error"]["code"], -32601);

    let ping = roundtrip(&server, json!({"jsonrpc": "2.0", "id": 11, "method": "ping"})).await;
    assert_eq!(ping["result"], json!({}));
}

#[tokio::test]
async fn serve_io_answers_each_request_line() {
    let (mut input, server_input) = tokio::io::duplex(64 * 1024);
    let (server_output, mut output) = tokio::io::duplex(1024 * 1024);

    let serving = tokio::spawn(serve_io(Arc::new(server()), server_input, server_output));

    let messages = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}),
    ];
    for message in &messages {
        input.write_all(message.to_string().as_bytes()).await.unwrap();
        input.write_all(b"\n\n").await.unwrap();
    }
    drop(input);

    let mut raw = String::new();
    output.read_to_string(&mut raw).await.unwrap();
    serving.await.unwrap().unwrap();

    let mut ids: Vec<i64> = raw
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
}
