//! infracost-mcp-server: MCP Protocol Server for Infracost
//!
//! Exposes the Infracost CLI (breakdown, diff, output, upload, comment) and
//! the Infracost Cloud API (tagging policies, guardrails, custom properties)
//! as MCP tools over stdio.
//!
//!   infracost-mcp-server                                # stdio, settings from env
//!   infracost-mcp-server --env-file ./infracost.env     # load variables first
//!   infracost-mcp-server --config infracost-mcp.toml    # settings file, env still wins
//!
//! Cloud tools need `INFRACOST_SERVICE_TOKEN`. `INFRACOST_ORG` sets the
//! default organization slug.

use anyhow::Result;
use clap::Parser;
use infracost_core::config::load_environment;
use infracost_core::Settings;
use infracost_mcp::transport::{StdioTransport, Transport};
use infracost_mcp::{McpServer, McpServerConfig};
use infracost_tools::ToolDispatcher;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "infracost-mcp-server")]
#[command(version, about = "MCP server for Infracost cost estimates and Infracost Cloud")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Environment file to load before reading settings
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Path to the infracost executable
    #[arg(long, value_name = "PATH")]
    infracost_bin: Option<String>,

    /// Server name override
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with protocol output on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Before the runtime starts any threads
    load_environment(cli.env_file.as_deref());

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bin) = cli.infracost_bin {
        settings.bin = Some(bin);
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(settings, cli.name))
}

async fn run(settings: Settings, name: Option<String>) -> Result<()> {
    let config = settings.infracost_config();
    info!(
        service_token = %config.token_summary(),
        org = %config.org_summary(),
        "Infracost configuration"
    );

    let dispatcher = ToolDispatcher::from_settings(&settings)?;
    if !dispatcher.cloud_enabled() {
        info!("Infracost Cloud tools disabled until INFRACOST_SERVICE_TOKEN is set");
    }
    info!(tools = dispatcher.registry().len(), "Tool registry initialized");

    let server = Arc::new(McpServer::new(McpServerConfig { name }, dispatcher));
    info!("Infracost MCP server running on stdio");
    StdioTransport::new().serve(server).await
}
