//! Phone number validation.

use crate::client::LocintelClient;
use crate::error::{LocintelError, LocintelResult};
use locintel_core::validate::{validate_batch, MAX_BATCH_SIZE};
use serde_json::Value;

pub struct PhonesApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> PhonesApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// `data` is `{"phoneNumber", "country"}`.
    pub async fn validate(&self, data: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/phone-numbers/validate", &data)
            .await
    }

    /// `data` is `{"phoneNumbers": [{"id", "phoneNumber", "country"}, ..]}` with at most ten entries.
    pub async fn validate_batch(&self, data: Value) -> LocintelResult<Value> {
        let count = data
            .get("phoneNumbers")
            .and_then(Value::as_array)
            .map(Vec::len)
            .ok_or_else(|| {
                LocintelError::InvalidInput("'phoneNumbers' must be an array".to_string())
            })?;
        validate_batch("phoneNumbers", count, MAX_BATCH_SIZE)?;

        self.client
            .http
            .post_json("/v1/phone-numbers/validate/batch", &data)
            .await
    }
}
