//! Geocoding, verification, autocomplete and key lookup endpoints.

use super::keyed_with_preferences;
use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::{require_non_empty, MatchMode};
use locintel_core::Coordinates;
use serde::Serialize;
use serde_json::Value;

/// Options shared by geocode, reverse geocode and verify.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeOptions {
    pub country: String,
    pub max_results: u32,
    pub return_all_info: bool,
    pub client_locale: String,
    pub match_mode: Option<MatchMode>,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            country: "USA".to_string(),
            max_results: 1,
            return_all_info: true,
            client_locale: "en_US".to_string(),
            match_mode: None,
        }
    }
}

impl GeocodeOptions {
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    fn preferences(&self, with_max_results: bool) -> Preferences<'_> {
        Preferences {
            max_results: with_max_results.then_some(self.max_results),
            return_all_info: self.return_all_info,
            client_locale: &self.client_locale,
            match_mode: self.match_mode,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Preferences<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
    return_all_info: bool,
    client_locale: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_mode: Option<MatchMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputAddress<'a> {
    address_id: &'a str,
    address_lines: [&'a str; 1],
    country: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputLocation<'a> {
    address_id: &'a str,
    longitude: f64,
    latitude: f64,
    country: &'a str,
}

#[derive(Debug, Serialize)]
struct AddressRequest<'a> {
    preferences: Preferences<'a>,
    addresses: [InputAddress<'a>; 1],
}

#[derive(Debug, Serialize)]
struct LocationRequest<'a> {
    preferences: Preferences<'a>,
    locations: [InputLocation<'a>; 1],
}

/// Geo addressing API.
pub struct GeoAddressingApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> GeoAddressingApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// Forward geocode a single-line address.
    pub async fn geocode(&self, address: &str, options: &GeocodeOptions) -> LocintelResult<Value> {
        let address = require_non_empty("address", address)?;
        let request = AddressRequest {
            preferences: options.preferences(true),
            addresses: [InputAddress {
                address_id: "1",
                address_lines: [address],
                country: &options.country,
            }],
        };
        self.client.http.post_json("/v1/geocode", &request).await
    }

    /// Nearest addresses for a point.
    pub async fn reverse_geocode(
        &self,
        point: Coordinates,
        options: &GeocodeOptions,
    ) -> LocintelResult<Value> {
        let request = LocationRequest {
            preferences: options.preferences(true),
            locations: [InputLocation {
                address_id: "1",
                longitude: point.longitude,
                latitude: point.latitude,
                country: &options.country,
            }],
        };
        self.client.http.post_json("/v1/reverse-geocode", &request).await
    }

    /// Verify and standardize an address.
    pub async fn verify(&self, address: &str, options: &GeocodeOptions) -> LocintelResult<Value> {
        let address = require_non_empty("address", address)?;
        let request = AddressRequest {
            preferences: options.preferences(false),
            addresses: [InputAddress {
                address_id: "1",
                address_lines: [address],
                country: &options.country,
            }],
        };
        self.client.http.post_json("/v1/verify", &request).await
    }

    pub async fn autocomplete(&self, address: Value, preferences: Option<Value>) -> LocintelResult<Value> {
        let body = keyed_with_preferences("address", address, preferences);
        self.client.http.post_json("/v1/autocomplete", &body).await
    }

    pub async fn autocomplete_postal_city(
        &self,
        address: Value,
        preferences: Option<Value>,
    ) -> LocintelResult<Value> {
        let body = keyed_with_preferences("address", address, preferences);
        self.client
            .http
            .post_json("/v1/autocomplete/postal-city", &body)
            .await
    }

    /// Express autocomplete.
    pub async fn express_autocomplete(
        &self,
        address: Value,
        preferences: Option<Value>,
    ) -> LocintelResult<Value> {
        let body = keyed_with_preferences("address", address, preferences);
        self.client
            .http
            .post_json("/v1/express-autocomplete", &body)
            .await
    }

    /// Address details by key, e.g. `{"key": "P0000GL41OME", "type": "PB_KEY", "country": "USA"}`.
    pub async fn lookup(&self, keys: Vec<Value>, preferences: Option<Value>) -> LocintelResult<Value> {
        let body = keyed_with_preferences("keys", Value::Array(keys), preferences);
        self.client.http.post_json("/v1/lookup", &body).await
    }
}
