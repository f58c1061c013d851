//! IP address and Wi-Fi access point geolocation.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::validate_ip_address;
use serde_json::Value;

/// Geolocation API.
pub struct GeolocationApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> GeolocationApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn by_ip_address(&self, ip_address: &str) -> LocintelResult<Value> {
        let ip = validate_ip_address(ip_address)?.to_string();
        self.client
            .http
            .get_query("/v1/geolocation/ip-address", &[("ipAddress", ip.as_str())])
            .await
    }

    /// `wifi` is sent as-is, e.g. `{"servingCell": {"mac": "..", "rssi": ".."}}`.
    pub async fn by_access_point(&self, wifi: Value) -> LocintelResult<Value> {
        self.client
            .http
            .post_json("/v1/geolocation/access-point", &wifi)
            .await
    }
}
