//! Name parsing.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use serde_json::Value;

pub struct NamesApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> NamesApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// `data` is sent as-is, e.g. `{"name": "John Robert Smith"}`.
    pub async fn parse(&self, data: Value) -> LocintelResult<Value> {
        self.client.http.post_json("/v1/names/parse", &data).await
    }
}
