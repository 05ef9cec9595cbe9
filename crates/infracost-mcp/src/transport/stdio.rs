//! Stdio Transport
//!
//! Each inbound line is handled on its own task so slow tool calls do not
//! block the stream. A single writer task owns stdout and writes one
//! response per line.

use super::{handle_message, McpHandler, Transport};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Stdio transport - reads JSON-RPC from stdin, writes to stdout
pub struct StdioTransport;

impl StdioTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for StdioTransport {
    async fn serve<H: McpHandler + 'static>(self, handler: Arc<H>) -> Result<()> {
        info!("Starting MCP stdio transport");
        serve_io(handler, tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("Stdio transport shutting down");
        Ok(())
    }
}

/// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
///
/// Returns once every in-flight request has been answered.
pub async fn serve_io<H, R, W>(handler: Arc<H>, reader: R, writer: W) -> Result<()>
where
    H: McpHandler + 'static,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if tx.is_closed() {
            break;
        }
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        debug!(request = %line, "Received request");

        let handler = Arc::clone(&handler);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = handle_message(handler.as_ref(), &line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(json) => {
                    debug!(response = %json, "Sending response");
                    let _ = tx.send(json);
                }
                Err(e) => error!(error = %e, "Failed to serialize response"),
            }
        });
    }

    drop(tx);
    writer_task.await??;
    Ok(())
}
