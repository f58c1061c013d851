// Tool server configuration: optional TOML file, then environment overrides

use crate::server::DEFAULT_SERVER_NAME;
use locintel_sdk::config::ENV_BASE_URL;
use locintel_sdk::{Credentials, LocintelClient, LocintelError, RetryConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "locintel.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] LocintelError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub vendor: VendorConfig,

    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_name")]
    pub name: String,
}

fn default_server_name() -> String {
    DEFAULT_SERVER_NAME.to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

impl McpConfig {
    /// Load from `path` (or `locintel.toml`), falling back to defaults when the
    /// file does not exist, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `PRECISELY_BASE_URL` replaces the configured gateway.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.vendor.base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vendor.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "vendor.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Invalid("server.name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.vendor.max_retries,
            ..RetryConfig::default()
        }
    }

    pub fn build_client_with(
        &self,
        credentials: Option<Credentials>,
    ) -> Result<LocintelClient, ConfigError> {
        let client = LocintelClient::builder()
            .base_url(self.vendor.base_url.clone())
            .maybe_credentials(credentials)
            .timeout(Duration::from_secs(self.vendor.timeout_secs))
            .retry_config(self.retry_config())
            .build()?;
        Ok(client)
    }

    /// Build the vendor client with credentials from the environment. Missing
    /// credentials are not fatal: local tools still work and vendor calls fail with 401.
    pub fn build_client(&self) -> Result<LocintelClient, ConfigError> {
        let credentials = Credentials::from_env();
        match &credentials {
            Some(c) => tracing::info!(kind = c.kind(), "Using vendor credentials"),
            None => tracing::warn!(
                "No vendor credentials found; set PRECISELY_BEARER_TOKEN or PRECISELY_API_KEY/PRECISELY_API_SECRET"
            ),
        }
        self.build_client_with(credentials)
    }
}
