use anyhow::{Context, Result};
use locintel_mcp::{build_registry, McpConfig, McpServer};
use serde::{Deserialize, Serialize};
use axum::http::HeaderValue;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `[vendor]` and `[server]` sections shared with the stdio binary
    #[serde(flatten)]
    pub mcp: McpConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call `/mcp`. Requests carrying any other
    /// `Origin` header are refused; clients that send none are unaffected.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        config.mcp.apply_overrides(|key| std::env::var(key).ok());
        config.mcp.validate()?;

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
    pub allowed_origins: Arc<Vec<HeaderValue>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = config
            .mcp
            .build_client()
            .context("Failed to create vendor client")?;
        let registry = build_registry(&client);
        tracing::info!("Registered {} tools", registry.len());

        let origins = parse_origins(&config.http.cors_origins)?;
        if origins.is_empty() {
            tracing::info!("No CORS origins configured, cross-origin requests are refused");
        } else {
            tracing::info!(origins = ?config.http.cors_origins, "CORS origins allowed");
        }

        Ok(Self::from_server(
            McpServer::new(registry).with_name(config.mcp.server.name.clone()),
        )
        .with_origins(origins))
    }

    pub fn from_server(server: McpServer) -> Self {
        Self {
            mcp: Arc::new(server),
            allowed_origins: Arc::new(Vec::new()),
        }
    }

    pub fn with_origins(mut self, origins: Vec<HeaderValue>) -> Self {
        self.allowed_origins = Arc::new(origins);
        self
    }
}

fn parse_origins(origins: &[String]) -> Result<Vec<HeaderValue>> {
    origins
        .iter()
        .map(|origin| {
            let origin = origin.trim().trim_end_matches('/');
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect()
}
