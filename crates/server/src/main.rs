use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::{AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "locintel-server")]
#[command(about = "Location intelligence tools over MCP (streamable HTTP)", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "locintel.toml", env = "LOCINTEL_CONFIG")]
    config: PathBuf,

    /// Port to listen on (overrides [http].port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides [http].host)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    tracing::info!("Starting Locintel MCP server");

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    let state = AppState::new(&config)?;
    api::serve(&config.bind_address(), state).await?;

    Ok(())
}
