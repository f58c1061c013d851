//! Configuration types for the Locintel SDK.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Production gateway for the Precisely APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.precisely.com";

pub const ENV_API_KEY: &str = "PRECISELY_API_KEY";
pub const ENV_API_SECRET: &str = "PRECISELY_API_SECRET";
pub const ENV_BEARER_TOKEN: &str = "PRECISELY_BEARER_TOKEN";
pub const ENV_BASE_URL: &str = "PRECISELY_BASE_URL";

/// Configuration for the Locintel client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the vendor gateway.
    pub base_url: Url,
    /// Credentials sent in the `Authorization` header.
    pub credentials: Option<Credentials>,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            credentials: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }
}

/// How the client authenticates against the gateway.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth access token, sent as `Bearer <token>`.
    Bearer(String),
    /// Bare API key, sent as `Apikey <key>`.
    ApiKey(String),
    /// Key and secret pair, sent as `Apikey base64(key:secret)`.
    ApiKeySecret { key: String, secret: String },
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    pub fn api_key_secret(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::ApiKeySecret {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        match self {
            Credentials::Bearer(token) => format!("Bearer {}", token),
            Credentials::ApiKey(key) => format!("Apikey {}", key),
            Credentials::ApiKeySecret { key, secret } => {
                format!("Apikey {}", STANDARD.encode(format!("{}:{}", key, secret)))
            }
        }
    }

    /// Resolve credentials from named variables. A bearer token takes precedence over a key;
    /// blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = read(ENV_BEARER_TOKEN) {
            return Some(Self::Bearer(token));
        }

        match (read(ENV_API_KEY), read(ENV_API_SECRET)) {
            (Some(key), Some(secret)) => Some(Self::ApiKeySecret { key, secret }),
            (Some(key), None) => Some(Self::ApiKey(key)),
            _ => None,
        }
    }

    /// Resolve credentials from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Bearer(_) => "bearer",
            Credentials::ApiKey(_) => "api_key",
            Credentials::ApiKeySecret { .. } => "api_key_secret",
        }
    }
}

// Secrets never reach logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credentials").field(&self.kind()).finish()
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Delay before the next attempt; a server-provided `Retry-After` wins over the
    /// computed backoff but is still capped.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(delay) => std::cmp::min(delay, self.max_backoff),
            None => self.backoff_for_attempt(attempt),
        }
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_backoff_calculation() {
        let config = RetryConfig::default();

        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(250));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let config = RetryConfig {
            max_backoff: Duration::from_millis(500),
            ..Default::default()
        };

        assert_eq!(config.backoff_for_attempt(10), Duration::from_millis(500));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let config = RetryConfig::default();

        assert_eq!(
            config.delay_for(0, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(
            config.delay_for(0, Some(Duration::from_secs(120))),
            Duration::from_secs(10)
        );
        assert_eq!(config.delay_for(1, None), Duration::from_millis(500));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();

        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(400));
        assert!(!config.should_retry_status(401));
    }

    #[test]
    fn test_client_config_defaults() {
        let url = Url::parse(DEFAULT_BASE_URL).unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.credentials.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_config.max_retries, 3);
    }

    #[test]
    fn test_authorization_headers() {
        assert_eq!(
            Credentials::bearer("tok-123").authorization_header(),
            "Bearer tok-123"
        );
        assert_eq!(Credentials::api_key("k1").authorization_header(), "Apikey k1");
        // base64("key:secret")
        assert_eq!(
            Credentials::api_key_secret("key", "secret").authorization_header(),
            "Apikey a2V5OnNlY3JldA=="
        );
    }

    #[test]
    fn test_bearer_wins_over_key() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_BEARER_TOKEN, "tok"),
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
        ]));
        assert_eq!(creds, Some(Credentials::bearer("tok")));
    }

    #[test]
    fn test_key_and_secret_from_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
        ]));
        assert_eq!(creds, Some(Credentials::api_key_secret("key", "secret")));

        let creds = Credentials::from_lookup(lookup_from(&[(ENV_API_KEY, "key")]));
        assert_eq!(creds, Some(Credentials::api_key("key")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_BEARER_TOKEN, "  "),
            (ENV_API_SECRET, "secret"),
        ]));
        assert_eq!(creds, None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::api_key_secret("key", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("api_key_secret"));
    }
}
