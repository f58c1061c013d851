//! Tax jurisdiction lookup endpoints.

use super::keyed_with_preferences;
use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::ValidationError;
use serde_json::Value;

/// Geo tax API.
pub struct GeoTaxApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> GeoTaxApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn by_address(&self, address: Value, preferences: Option<Value>) -> LocintelResult<Value> {
        let body = keyed_with_preferences("address", address, preferences);
        self.client.http.post_json("/v1/geo-tax/address", &body).await
    }

    pub async fn by_addresses(
        &self,
        addresses: Vec<Value>,
        preferences: Option<Value>,
    ) -> LocintelResult<Value> {
        if addresses.is_empty() {
            return Err(ValidationError::Empty { field: "addresses" }.into());
        }
        let body = keyed_with_preferences("addresses", Value::Array(addresses), preferences);
        self.client
            .http
            .post_json("/v1/geo-tax/address/batch", &body)
            .await
    }

    /// `location` is `{"longitude", "latitude"}`.
    pub async fn by_location(&self, location: Value, preferences: Option<Value>) -> LocintelResult<Value> {
        let body = keyed_with_preferences("location", location, preferences);
        self.client.http.post_json("/v1/geo-tax/location", &body).await
    }

    pub async fn by_locations(
        &self,
        locations: Vec<Value>,
        preferences: Option<Value>,
    ) -> LocintelResult<Value> {
        if locations.is_empty() {
            return Err(ValidationError::Empty { field: "locations" }.into());
        }
        let body = keyed_with_preferences("locations", Value::Array(locations), preferences);
        self.client
            .http
            .post_json("/v1/geo-tax/location/batch", &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_by_locations_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/geo-tax/location/batch"))
            .and(body_json(json!({
                "locations": [{"longitude": -98.401796, "latitude": 34.688726}],
                "preferences": {"returnLatLongFields": "Y"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"taxResponses": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .geo_tax()
            .by_locations(
                vec![json!({"longitude": -98.401796, "latitude": 34.688726})],
                Some(json!({"returnLatLongFields": "Y"})),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_by_address_defaults_preferences() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/geo-tax/address"))
            .and(body_json(json!({
                "address": {"addressLines": ["123 Main St, Boston, MA"]},
                "preferences": {}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"taxResponses": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .geo_tax()
            .by_address(json!({"addressLines": ["123 Main St, Boston, MA"]}), None)
            .await
            .unwrap();
    }
}
