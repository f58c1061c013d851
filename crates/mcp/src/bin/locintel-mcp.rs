// Standalone MCP server binary (stdio transport)

use anyhow::{Context, Result};
use clap::Parser;
use locintel_mcp::{build_registry, McpConfig, McpServer};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "locintel-mcp")]
#[command(about = "Location intelligence tools over MCP (stdio)", long_about = None)]
struct Args {
    /// Path to configuration file (defaults to ./locintel.toml when present)
    #[arg(short, long, env = "LOCINTEL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries JSON-RPC frames, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Locintel MCP server starting...");

    let config = McpConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let client = config.build_client().context("Failed to create vendor client")?;

    let registry = build_registry(&client);
    for (category, count) in registry.category_counts() {
        tracing::debug!(%category, count, "Tools registered");
    }
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry).with_name(config.server.name.clone());
    server.serve_stdio().await?;

    Ok(())
}
