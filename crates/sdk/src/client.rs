//! Main client for the Locintel SDK.

use crate::api::*;
use crate::config::{ClientConfig, Credentials, RetryConfig, DEFAULT_BASE_URL, ENV_BASE_URL};
use crate::error::{LocintelError, LocintelResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for the Precisely location intelligence APIs.
#[derive(Debug, Clone)]
pub struct LocintelClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl LocintelClient {
    /// Create a new client builder.
    pub fn builder() -> LocintelClientBuilder {
        LocintelClientBuilder::new()
    }

    /// Build a client from `PRECISELY_*` environment variables.
    pub fn from_env() -> LocintelResult<Self> {
        let credentials = Credentials::from_env().ok_or_else(|| {
            LocintelError::Config(
                "no credentials: set PRECISELY_BEARER_TOKEN or PRECISELY_API_KEY/PRECISELY_API_SECRET"
                    .to_string(),
            )
        })?;

        let mut builder = Self::builder().credentials(credentials);
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                builder = builder.base_url(base_url.trim());
            }
        }
        builder.build()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> LocintelResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Geocoding, verification, autocomplete and key lookup.
    pub fn geo_addressing(&self) -> GeoAddressingApi<'_> {
        GeoAddressingApi::new(self)
    }

    /// Address parsing.
    pub fn address_parser(&self) -> AddressParserApi<'_> {
        AddressParserApi::new(self)
    }

    /// E-mail verification.
    pub fn emails(&self) -> EmailsApi<'_> {
        EmailsApi::new(self)
    }

    /// PSAP and AHJ emergency contacts.
    pub fn emergency_info(&self) -> EmergencyInfoApi<'_> {
        EmergencyInfoApi::new(self)
    }

    /// Tax jurisdiction lookup.
    pub fn geo_tax(&self) -> GeoTaxApi<'_> {
        GeoTaxApi::new(self)
    }

    /// IP and Wi-Fi geolocation.
    pub fn geolocation(&self) -> GeolocationApi<'_> {
        GeolocationApi::new(self)
    }

    /// Personal name parsing.
    pub fn names(&self) -> NamesApi<'_> {
        NamesApi::new(self)
    }

    /// Phone number validation.
    pub fn phones(&self) -> PhonesApi<'_> {
        PhonesApi::new(self)
    }

    /// Time zone lookup.
    pub fn timezone(&self) -> TimezoneApi<'_> {
        TimezoneApi::new(self)
    }

    /// Routes and travel cost matrices.
    pub fn routing(&self) -> RoutingApi<'_> {
        RoutingApi::new(self)
    }

    /// Intersections and speed limits.
    pub fn streets(&self) -> StreetsApi<'_> {
        StreetsApi::new(self)
    }

    /// Crime risk and hazard history by location.
    pub fn risks(&self) -> RisksApi<'_> {
        RisksApi::new(self)
    }

    /// Data graph (GraphQL).
    pub fn data_graph(&self) -> DataGraphApi<'_> {
        DataGraphApi::new(self)
    }
}

/// Builder for creating a LocintelClient.
pub struct LocintelClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl LocintelClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the gateway base URL. Defaults to the production gateway.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn maybe_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> LocintelResult<LocintelClient> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if base_url.cannot_be_a_base() {
            return Err(LocintelError::Config(format!(
                "base_url '{}' cannot be used as a base",
                base_url
            )));
        }

        let config = ClientConfig {
            base_url,
            credentials: self.credentials,
            timeout: self.timeout,
            retry_config: self.retry_config,
        };

        LocintelClient::from_config(config)
    }
}

impl Default for LocintelClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
