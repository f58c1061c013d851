// Tax jurisdiction lookups

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{check_lat_lon_fields, parse_args, require_entries, required};
use crate::tools::envelope::respond;
use crate::tools::{json_schema_any_object, json_schema_array, json_schema_object, Tool, ToolCategory};
use anyhow::Result;
use locintel_sdk::{LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxLookupKind {
    Address,
    Addresses,
    Location,
    Locations,
}

impl TaxLookupKind {
    pub const ALL: [TaxLookupKind; 4] = [
        TaxLookupKind::Address,
        TaxLookupKind::Addresses,
        TaxLookupKind::Location,
        TaxLookupKind::Locations,
    ];

    fn tool_name(&self) -> &'static str {
        match self {
            TaxLookupKind::Address => "lookup_by_address",
            TaxLookupKind::Addresses => "lookup_by_addresses",
            TaxLookupKind::Location => "lookup_by_location",
            TaxLookupKind::Locations => "lookup_by_locations",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            TaxLookupKind::Address => "address",
            TaxLookupKind::Addresses => "addresses",
            TaxLookupKind::Location => "location",
            TaxLookupKind::Locations => "locations",
        }
    }
}

pub struct TaxLookupTool {
    client: LocintelClient,
    kind: TaxLookupKind,
}

impl TaxLookupTool {
    pub fn new(client: LocintelClient, kind: TaxLookupKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, args: TaxLookupArgs) -> Result<LocintelResult<Value>> {
        let name = self.kind.tool_name();
        let preferences = args.preferences.map(Value::Object);
        let api = self.client.geo_tax();

        let result = match self.kind {
            TaxLookupKind::Address => {
                let address = required(name, "address", args.address)?;
                api.by_address(Value::Object(address), preferences).await
            }
            TaxLookupKind::Addresses => {
                let addresses = required(name, "addresses", args.addresses)?;
                api.by_addresses(addresses, preferences).await
            }
            TaxLookupKind::Location => {
                let location = required(name, "location", args.location)?;
                match check_lat_lon_fields(&location) {
                    Ok(()) => api.by_location(Value::Object(location), preferences).await,
                    Err(e) => Err(e.into()),
                }
            }
            TaxLookupKind::Locations => {
                let locations = required(name, "locations", args.locations)?;
                match check_locations(&locations) {
                    Ok(()) => {
                        let locations = locations.into_iter().map(Value::Object).collect();
                        api.by_locations(locations, preferences).await
                    }
                    Err(e) => Err(e),
                }
            }
        };
        Ok(result)
    }
}

fn check_locations(locations: &[Map<String, Value>]) -> LocintelResult<()> {
    require_entries("locations", locations)?;
    for location in locations {
        check_lat_lon_fields(location)?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TaxLookupArgs {
    #[serde(default)]
    address: Option<Map<String, Value>>,
    #[serde(default)]
    addresses: Option<Vec<Value>>,
    #[serde(default)]
    location: Option<Map<String, Value>>,
    #[serde(default)]
    locations: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    preferences: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for TaxLookupTool {
    fn schema(&self) -> ToolSchema {
        let (description, input) = match self.kind {
            TaxLookupKind::Address => (
                "Lookup tax jurisdiction by address. Example: {'address': {'addressLines': ['123 Main St, Boston, MA']}}",
                json_schema_any_object("Address object with addressLines"),
            ),
            TaxLookupKind::Addresses => (
                "Get tax jurisdictions for multiple addresses. Example: {'addresses': [{'addressLines': ['2001 Main St, Eagle Butte, SD 57625']}, {'addressLines': ['2520 Columbia House Blvd #108, Vancouver, WA 98661']}], 'preferences': {}}",
                json_schema_array(json_schema_any_object("Address object"), "Addresses to look up"),
            ),
            TaxLookupKind::Location => (
                "Lookup tax jurisdiction by coordinates. Example: {'location': {'longitude': -71.0589, 'latitude': 42.3601}}",
                json_schema_any_object("Object with longitude and latitude"),
            ),
            TaxLookupKind::Locations => (
                "Find tax jurisdictions for multiple coordinates. Example: {'locations': [{'longitude': -98.401796, 'latitude': 34.688726}, {'longitude': -92.9036, 'latitude': 34.8192}], 'preferences': {}}",
                json_schema_array(json_schema_any_object("Object with longitude and latitude"), "Points to look up"),
            ),
        };

        let mut properties = Map::new();
        properties.insert(self.kind.field().to_string(), input);
        properties.insert(
            "preferences".to_string(),
            json_schema_any_object("Optional vendor preferences"),
        );

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(Value::Object(properties), vec![self.kind.field()]),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: TaxLookupArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond(self.run(args).await?))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::GeoTax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{envelope_of, test_client};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_by_location_sends_empty_preferences() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/geo-tax/location"))
            .and(body_json(json!({
                "location": {"longitude": -71.0589, "latitude": 42.3601},
                "preferences": {}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "taxJurisdiction": {"state": {"code": "25", "name": "MASSACHUSETTS"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TaxLookupTool::new(test_client(&server), TaxLookupKind::Location);
        let result = tool
            .execute(json!({"location": {"longitude": -71.0589, "latitude": 42.3601}}))
            .await
            .unwrap();

        let envelope = envelope_of(&result);
        assert_eq!(
            envelope.data.unwrap()["taxJurisdiction"]["state"]["name"],
            "MASSACHUSETTS"
        );
    }

    #[tokio::test]
    async fn test_lookup_by_locations_checks_each_point() {
        let server = MockServer::start().await;
        let tool = TaxLookupTool::new(test_client(&server), TaxLookupKind::Locations);
        let result = tool
            .execute(json!({"locations": [
                {"longitude": -98.401796, "latitude": 34.688726},
                {"longitude": -192.9036, "latitude": 34.8192}
            ]}))
            .await
            .unwrap();

        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("longitude must be between -180 and 180, got -192.9036")
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_argument_error() {
        let server = MockServer::start().await;
        let tool = TaxLookupTool::new(test_client(&server), TaxLookupKind::Addresses);
        let err = tool.execute(json!({"address": {}})).await.unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "Invalid arguments for lookup_by_addresses: missing field `addresses`"
        );
    }
}
