//! Address parsing endpoints.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::{require_non_empty, validate_batch, MAX_BATCH_SIZE};
use serde_json::{json, Value};

/// Address parser API.
pub struct AddressParserApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> AddressParserApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// Split a single-line address into components.
    pub async fn parse(&self, address: &str) -> LocintelResult<Value> {
        let address = require_non_empty("address", address)?;
        self.client
            .http
            .post_json("/v1/address/parse", &json!({ "address": address }))
            .await
    }

    /// Parse up to ten `{"id", "address"}` entries.
    pub async fn parse_batch(&self, addresses: Vec<Value>) -> LocintelResult<Value> {
        validate_batch("addresses", addresses.len(), MAX_BATCH_SIZE)?;
        self.client
            .http
            .post_json("/v1/address/parse/batch", &json!({ "addresses": addresses }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::test_client;
    use crate::error::LocintelError;
    use locintel_core::ValidationError;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_parse_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/address/parse/batch"))
            .and(body_json(json!({"addresses": [{"id": "1", "address": "123 Main St, Boston, MA 02101"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [{"id": "1"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .address_parser()
            .parse_batch(vec![json!({"id": "1", "address": "123 Main St, Boston, MA 02101"})])
            .await
            .unwrap();
        assert_eq!(result["responses"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_parse_batch_limit() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        let entries = (0..11).map(|i| json!({"id": i.to_string(), "address": "x"})).collect();
        let err = client.address_parser().parse_batch(entries).await.unwrap_err();
        assert!(matches!(
            err,
            LocintelError::Validation(ValidationError::TooMany { max: 10, len: 11, .. })
        ));

        let err = client.address_parser().parse_batch(Vec::new()).await.unwrap_err();
        assert!(matches!(err, LocintelError::Validation(ValidationError::Empty { .. })));
    }
}
