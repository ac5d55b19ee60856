use anyhow::{Context, Result};
use clap::Parser;
use stepwise_config::resolve_config;
use stepwise_mcp_server::{serve, Cli, McpServer};
use stepwise_telemetry::{init_subscriber, TelemetryConfig};
use tokio::io::{self, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let resolved = resolve_config(cli.config.as_deref())?;

    // stderr only: stdout is the JSON-RPC channel
    let telemetry = TelemetryConfig::from(&resolved.config.telemetry)
        .with_level(cli.log_level.as_deref())
        .with_json_output(cli.json_logs);
    init_subscriber(&telemetry);

    match &resolved.path {
        Some(path) => tracing::info!(config = %path.display(), "loaded configuration"),
        None => tracing::info!("no configuration file found, using defaults"),
    }

    let server =
        McpServer::from_config(&resolved.config).context("Failed to register tools")?;
    tracing::info!(
        name = server.name(),
        tools = ?server.tool_names(),
        "serving on stdio"
    );

    serve(&server, BufReader::new(io::stdin()), io::stdout()).await
}
