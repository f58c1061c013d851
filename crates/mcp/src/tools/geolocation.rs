// IP address and Wi-Fi access point geolocation

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::parse_args;
use crate::tools::envelope::respond;
use crate::tools::{json_schema_any_object, json_schema_object, json_schema_string, Tool, ToolCategory};
use anyhow::Result;
use locintel_sdk::LocintelClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub struct IpGeolocationTool {
    client: LocintelClient,
}

impl IpGeolocationTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct IpArgs {
    ip_address: String,
}

#[async_trait::async_trait]
impl Tool for IpGeolocationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "geo_locate_ip_address".to_string(),
            description: "Geolocate IP address. Example: {'ip_address': '8.8.8.8'}".to_string(),
            input_schema: json_schema_object(
                json!({"ip_address": json_schema_string("IPv4 or IPv6 address")}),
                vec!["ip_address"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: IpArgs = parse_args("geo_locate_ip_address", arguments)?;
        Ok(respond(
            self.client.geolocation().by_ip_address(&args.ip_address).await,
        ))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Geolocation
    }
}

pub struct WifiGeolocationTool {
    client: LocintelClient,
}

impl WifiGeolocationTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct WifiArgs {
    wifi_data: Map<String, Value>,
}

#[async_trait::async_trait]
impl Tool for WifiGeolocationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "geo_locate_wifi_access_point".to_string(),
            description: "Geolocate WiFi access point. Example: {'wifi_data': {'servingCell': {'mac': '00:22:75:10:d5:91', 'rssi': '-90'}}}".to_string(),
            input_schema: json_schema_object(
                json!({"wifi_data": json_schema_any_object("Access point observation")}),
                vec!["wifi_data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: WifiArgs = parse_args("geo_locate_wifi_access_point", arguments)?;
        Ok(respond(
            self.client
                .geolocation()
                .by_access_point(Value::Object(args.wifi_data))
                .await,
        ))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Geolocation
    }
}
