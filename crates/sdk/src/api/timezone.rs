//! Time zone lookup by address or location.

use crate::client::LocintelClient;
use crate::error::{LocintelError, LocintelResult};
use chrono::Utc;
use serde_json::Value;

pub struct TimezoneApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> TimezoneApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// `data` is `{"addresses": [{"timestamp", "address": {..}}]}`.
    pub async fn by_addresses(&self, mut data: Value) -> LocintelResult<Value> {
        fill_missing_timestamps(&mut data, "addresses", Utc::now().timestamp_millis())?;
        self.client.http.post_json("/v1/timezone/address", &data).await
    }

    /// `data` is `{"locations": [{"id", "timestamp", "geometry": {"coordinates": [lon, lat]}}]}`.
    pub async fn by_locations(&self, mut data: Value) -> LocintelResult<Value> {
        fill_missing_timestamps(&mut data, "locations", Utc::now().timestamp_millis())?;
        self.client.http.post_json("/v1/timezone/location", &data).await
    }
}

/// The offset depends on the instant (DST), so every entry needs an epoch-millis
/// timestamp. Entries without one are stamped with `now_ms`.
pub fn fill_missing_timestamps(data: &mut Value, key: &str, now_ms: i64) -> LocintelResult<()> {
    let entries = data
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| LocintelError::InvalidInput(format!("'{}' must be an array", key)))?;

    if entries.is_empty() {
        return Err(LocintelError::InvalidInput(format!("'{}' must not be empty", key)));
    }

    for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
        let missing = entry.get("timestamp").map_or(true, Value::is_null);
        if missing {
            entry.insert("timestamp".to_string(), Value::from(now_ms));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_fill_missing_timestamps() {
        let mut data = json!({"locations": [
            {"id": "1", "geometry": {"coordinates": [-71.0589, 42.3601]}},
            {"id": "2", "timestamp": 1691138974831i64, "geometry": {"coordinates": [-71.0, 42.0]}},
            {"id": "3", "timestamp": null}
        ]});

        fill_missing_timestamps(&mut data, "locations", 1700000000000).unwrap();
        assert_eq!(data["locations"][0]["timestamp"], json!(1700000000000i64));
        assert_eq!(data["locations"][1]["timestamp"], json!(1691138974831i64));
        assert_eq!(data["locations"][2]["timestamp"], json!(1700000000000i64));
    }

    #[test]
    fn test_fill_requires_entries() {
        assert!(fill_missing_timestamps(&mut json!({}), "addresses", 0).is_err());
        assert!(fill_missing_timestamps(&mut json!({"addresses": []}), "addresses", 0).is_err());
    }

    #[tokio::test]
    async fn test_by_addresses_posts_stamped_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/timezone/address"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"timezones": [{"id": "1"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .timezone()
            .by_addresses(json!({"addresses": [{"address": {"id": "1", "addressLines": ["1700 District Ave, Burlington, MA"], "country": "USA"}}]}))
            .await
            .unwrap();
        assert_eq!(result["timezones"][0]["id"], "1");

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(sent["addresses"][0]["timestamp"].is_i64());
    }
}
