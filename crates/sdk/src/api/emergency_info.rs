//! PSAP (911 answering point) and AHJ (authority having jurisdiction) endpoints.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::require_non_empty;
use serde_json::{json, Value};

/// Emergency info API.
pub struct EmergencyInfoApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> EmergencyInfoApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// `address` is an object such as `{"addressLines": [..], "city", "admin1", "postalCode"}`.
    pub async fn psap_by_address(&self, address: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/emergency-info/psap/address", &json!({ "address": address }))
            .await
    }

    /// `location` is `{"coordinates": [lon, lat]}`.
    pub async fn psap_by_location(&self, location: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/emergency-info/psap/location", &json!({ "location": location }))
            .await
    }

    pub async fn psap_ahj_by_address(&self, address: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/emergency-info/psap-ahj/address", &json!({ "address": address }))
            .await
    }

    pub async fn psap_ahj_by_location(&self, location: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/emergency-info/psap-ahj/location", &json!({ "location": location }))
            .await
    }

    pub async fn psap_ahj_by_fcc_id(&self, fcc_id: &str) -> LocintelResult<Value> {
        let fcc_id = require_non_empty("fcc_id", fcc_id)?;
        self.client
            .http
            .get_query("/v1/emergency-info/psap-ahj/fccid", &[("fccId", fcc_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_psap_by_location_wraps_location() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/emergency-info/psap/location"))
            .and(body_json(json!({"location": {"coordinates": [-73.22344, 41.23443]}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fccId": "1404"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .emergency_info()
            .psap_by_location(json!({"coordinates": [-73.22344, 41.23443]}))
            .await
            .unwrap();
        assert_eq!(result["fccId"], "1404");
    }

    #[tokio::test]
    async fn test_psap_ahj_by_fcc_id_uses_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/emergency-info/psap-ahj/fccid"))
            .and(query_param("fccId", "1404"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"psap": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.emergency_info().psap_ahj_by_fcc_id(" 1404 ").await.unwrap();
    }
}
