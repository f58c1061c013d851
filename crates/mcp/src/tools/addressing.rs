// Geocoding, verification, autocomplete, lookup and parsing tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{parse_args, require_entries, NumberOrString};
use crate::tools::envelope::respond;
use crate::tools::{
    json_schema_any_object, json_schema_array, json_schema_enum, json_schema_number,
    json_schema_object, json_schema_string, json_schema_string_default, Tool, ToolCategory,
};
use anyhow::Result;
use locintel_core::validate::{validate_batch, validate_country, MatchMode, MAX_BATCH_SIZE};
use locintel_core::Coordinates;
use locintel_sdk::{GeocodeOptions, LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

fn geocode_options(country: Option<&str>, match_mode: Option<&str>) -> LocintelResult<GeocodeOptions> {
    let mut options = GeocodeOptions::default();
    if let Some(country) = country {
        options = options.country(validate_country(country)?);
    }
    if let Some(mode) = match_mode {
        options = options.match_mode(mode.parse::<MatchMode>()?);
    }
    Ok(options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLineKind {
    Geocode,
    Verify,
}

/// `geocode` and `verify_address`: a single free-form address line.
pub struct AddressLineTool {
    client: LocintelClient,
    kind: AddressLineKind,
}

impl AddressLineTool {
    pub fn new(client: LocintelClient, kind: AddressLineKind) -> Self {
        Self { client, kind }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            AddressLineKind::Geocode => "geocode",
            AddressLineKind::Verify => "verify_address",
        }
    }

    async fn run(&self, args: AddressLineArgs) -> LocintelResult<Value> {
        let options = geocode_options(args.country.as_deref(), args.match_mode.as_deref())?;
        let api = self.client.geo_addressing();
        match self.kind {
            AddressLineKind::Geocode => api.geocode(&args.address, &options).await,
            AddressLineKind::Verify => api.verify(&args.address, &options).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddressLineArgs {
    address: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    match_mode: Option<String>,
}

#[async_trait::async_trait]
impl Tool for AddressLineTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.kind {
            AddressLineKind::Geocode => "Convert address to coordinates. Example: {'address': '42 Valley Of The Sun Dr, Fairplay, CO 80440', 'country': 'USA'}",
            AddressLineKind::Verify => "Verify and standardize address. Example: {'address': '1600 Pennsylvania Ave, Washington DC', 'country': 'USA'}",
        };
        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                json!({
                    "address": json_schema_string("Single-line address"),
                    "country": json_schema_string_default("ISO country code", "USA"),
                    "match_mode": json_schema_enum("Match leniency", &MatchMode::ALLOWED)
                }),
                vec!["address"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AddressLineArgs = parse_args(self.name(), arguments)?;
        Ok(respond(self.run(args).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}

pub struct ReverseGeocodeTool {
    client: LocintelClient,
}

impl ReverseGeocodeTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }

    async fn run(&self, args: ReverseGeocodeArgs) -> LocintelResult<Value> {
        let point = Coordinates::new(
            args.lat.coordinate("latitude")?,
            args.lon.coordinate("longitude")?,
        )?;
        let options = geocode_options(args.country.as_deref(), None)?;
        self.client
            .geo_addressing()
            .reverse_geocode(point, &options)
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeArgs {
    lat: NumberOrString,
    lon: NumberOrString,
    #[serde(default)]
    country: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ReverseGeocodeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "reverse_geocode".to_string(),
            description: "Convert coordinates to address. Example: {'lat': 39.5501, 'lon': -105.9999, 'country': 'USA'}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "lat": json_schema_number("Latitude (-90 to 90)"),
                    "lon": json_schema_number("Longitude (-180 to 180)"),
                    "country": json_schema_string_default("ISO country code", "USA")
                }),
                vec!["lat", "lon"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ReverseGeocodeArgs = parse_args("reverse_geocode", arguments)?;
        Ok(respond(self.run(args).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteKind {
    Standard,
    PostalCity,
    Express,
}

pub struct AutocompleteTool {
    client: LocintelClient,
    kind: AutocompleteKind,
}

impl AutocompleteTool {
    pub fn new(client: LocintelClient, kind: AutocompleteKind) -> Self {
        Self { client, kind }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            AutocompleteKind::Standard => "autocomplete",
            AutocompleteKind::PostalCity => "autocomplete_postal_city",
            AutocompleteKind::Express => "autocomplete_v2",
        }
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteArgs {
    address: Map<String, Value>,
    #[serde(default)]
    preferences: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for AutocompleteTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.kind {
            AutocompleteKind::Standard => "Address autocomplete suggestions. Example: {'address': {'addressLines': ['1700 District'], 'country': 'USA'}, 'preferences': {'maxResults': 5}}",
            AutocompleteKind::PostalCity => "Autocomplete postal codes and cities. Example: {'address': {'type': 'POSTAL', 'postAddress': '12180', 'country': 'USA'}, 'preferences': {'maxResults': 5}}",
            AutocompleteKind::Express => "Express autocomplete (V2). Example: {'address': {'addressLines': ['350 Jordan'], 'country': 'USA'}, 'preferences': {'maxResults': 5}}",
        };
        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                json!({
                    "address": json_schema_any_object("Partial address object"),
                    "preferences": json_schema_any_object("Optional vendor preferences")
                }),
                vec!["address"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AutocompleteArgs = parse_args(self.name(), arguments)?;
        let address = Value::Object(args.address);
        let preferences = args.preferences.map(Value::Object);
        let api = self.client.geo_addressing();

        let result = match self.kind {
            AutocompleteKind::Standard => api.autocomplete(address, preferences).await,
            AutocompleteKind::PostalCity => api.autocomplete_postal_city(address, preferences).await,
            AutocompleteKind::Express => api.express_autocomplete(address, preferences).await,
        };
        Ok(respond(result))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}

/// Lookup by PreciselyID or other vendor keys
pub struct LookupTool {
    client: LocintelClient,
}

impl LookupTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }

    async fn run(&self, args: LookupArgs) -> LocintelResult<Value> {
        require_entries("keys", &args.keys)?;
        let keys = args.keys.into_iter().map(Value::Object).collect();
        self.client
            .geo_addressing()
            .lookup(keys, args.preferences.map(Value::Object))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct LookupArgs {
    keys: Vec<Map<String, Value>>,
    #[serde(default)]
    preferences: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for LookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "lookup".to_string(),
            description: "Lookup address by PreciselyID. Example: {'keys': [{'key': 'P0000GL41OME', 'country': 'USA', 'type': 'PB_KEY'}]}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "keys": json_schema_array(json_schema_any_object("Lookup key"), "Keys to resolve"),
                    "preferences": json_schema_any_object("Optional vendor preferences")
                }),
                vec!["keys"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: LookupArgs = parse_args("lookup", arguments)?;
        Ok(respond(self.run(args).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}

pub struct ParseAddressTool {
    client: LocintelClient,
}

impl ParseAddressTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ParseAddressArgs {
    address: String,
}

#[async_trait::async_trait]
impl Tool for ParseAddressTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "parse_address".to_string(),
            description: "Parse single address. Example: {'address': '1700 District Ave #300, Burlington, MA 01803'}".to_string(),
            input_schema: json_schema_object(
                json!({"address": json_schema_string("Single-line address")}),
                vec!["address"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ParseAddressArgs = parse_args("parse_address", arguments)?;
        Ok(respond(self.client.address_parser().parse(&args.address).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}

pub struct ParseAddressBatchTool {
    client: LocintelClient,
}

impl ParseAddressBatchTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }

    async fn run(&self, args: ParseAddressBatchArgs) -> LocintelResult<Value> {
        validate_batch("addresses", args.addresses.len(), MAX_BATCH_SIZE)?;
        self.client.address_parser().parse_batch(args.addresses).await
    }
}

#[derive(Debug, Deserialize)]
struct ParseAddressBatchArgs {
    addresses: Vec<Value>,
}

#[async_trait::async_trait]
impl Tool for ParseAddressBatchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "parse_address_batch".to_string(),
            description: "Parse multiple addresses (max 10). Example: {'addresses': [{'id': '1', 'address': '123 Main St, Boston, MA 02101'}, {'id': '2', 'address': '456 Oak Ave, Denver, CO 80203'}]}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "addresses": json_schema_array(
                        json_schema_any_object("{'id', 'address'}"),
                        "Up to 10 addresses"
                    )
                }),
                vec!["addresses"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ParseAddressBatchArgs = parse_args("parse_address_batch", arguments)?;
        Ok(respond(self.run(args).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Addressing
    }
}
