// Data graph tools: canned per-address reports and caller-written GraphQL

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::parse_args;
use crate::tools::envelope::respond_graphql;
use crate::tools::{
    json_schema_any_object, json_schema_object, json_schema_string, json_schema_string_default,
    Tool, ToolCategory,
};
use anyhow::Result;
use locintel_core::validate::QueryType;
use locintel_core::{GraphQlResponse, ValidationError};
use locintel_sdk::api::data_graph::DEFAULT_DATA_GRAPH_COUNTRY;
use locintel_sdk::{DataGraphQuery, GraphQlRequest, LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Value};

const EXAMPLE_ADDRESS: &str = "2755 Milwaukee St, Denver, 80238 CO";

/// Tool name for each canned query
pub fn tool_name(query: DataGraphQuery) -> &'static str {
    match query {
        DataGraphQuery::PropertyData => "get_property_data",
        DataGraphQuery::PropertyAttributes => "get_property_attributes_by_address",
        DataGraphQuery::ReplacementCost => "get_replacement_cost_by_address",
        DataGraphQuery::FloodRisk => "get_flood_risk_by_address",
        DataGraphQuery::WildfireRisk => "get_wildfire_risk_by_address",
        DataGraphQuery::PropertyFireRisk => "get_property_fire_risk",
        DataGraphQuery::EarthRisk => "get_earth_risk",
        DataGraphQuery::CoastalRisk => "get_coastal_risk",
        DataGraphQuery::HistoricalWeatherRisk => "get_historical_weather_risk",
        DataGraphQuery::Demographics => "get_demographics",
        DataGraphQuery::CrimeIndex => "get_crime_index",
        DataGraphQuery::PsyteGeodemographics => "get_psyte_geodemographics_by_address",
        DataGraphQuery::GroundView => "get_ground_view_by_address",
        DataGraphQuery::Neighborhoods => "get_neighborhoods_by_address",
        DataGraphQuery::Schools => "get_schools_by_address",
        DataGraphQuery::Buildings => "get_buildings_by_address",
        DataGraphQuery::Parcels => "get_parcels_by_address",
    }
}

/// One canned data-graph report for an address
pub struct DataGraphTool {
    client: LocintelClient,
    query: DataGraphQuery,
}

impl DataGraphTool {
    pub fn new(client: LocintelClient, query: DataGraphQuery) -> Self {
        Self { client, query }
    }
}

#[derive(Debug, Deserialize)]
struct DataGraphArgs {
    address: String,
    #[serde(default)]
    country: Option<String>,
}

#[async_trait::async_trait]
impl Tool for DataGraphTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: tool_name(self.query).to_string(),
            description: format!(
                "Get {} by address. Example: {{'address': '{}', 'country': 'US'}}",
                self.query.label(),
                EXAMPLE_ADDRESS
            ),
            input_schema: json_schema_object(
                json!({
                    "address": json_schema_string("Single-line address"),
                    "country": json_schema_string_default("ISO country code", DEFAULT_DATA_GRAPH_COUNTRY)
                }),
                vec!["address"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: DataGraphArgs = parse_args(tool_name(self.query), arguments)?;
        let result = self
            .client
            .data_graph()
            .by_address(self.query, &args.address, args.country.as_deref())
            .await;
        Ok(respond_graphql(result))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::DataGraph
    }
}

/// Caller-written GraphQL against the data graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomQueryKind {
    AddressesDetailed,
    ParcelByOwner,
    AddressFamily,
    Serviceability,
    PlacesByAddress,
}

impl CustomQueryKind {
    pub const ALL: [CustomQueryKind; 5] = [
        CustomQueryKind::AddressesDetailed,
        CustomQueryKind::ParcelByOwner,
        CustomQueryKind::AddressFamily,
        CustomQueryKind::Serviceability,
        CustomQueryKind::PlacesByAddress,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            CustomQueryKind::AddressesDetailed => "get_addresses_detailed",
            CustomQueryKind::ParcelByOwner => "get_parcel_by_owner_detailed",
            CustomQueryKind::AddressFamily => "get_address_family",
            CustomQueryKind::Serviceability => "get_serviceability",
            CustomQueryKind::PlacesByAddress => "get_places_by_address",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            CustomQueryKind::AddressesDetailed => "Get detailed address information using custom GraphQL query.",
            CustomQueryKind::ParcelByOwner => "Get parcel information by owner using GraphQL query. Query by PreciselyID, address, or coordinates.",
            CustomQueryKind::AddressFamily => "Get related addresses for a given PreciselyID using GraphQL query.",
            CustomQueryKind::Serviceability => "Get broadband/utility serviceability information using GraphQL query.",
            CustomQueryKind::PlacesByAddress => "Get places (points of interest) by address using GraphQL query.",
        }
    }

    fn example(&self) -> Value {
        match self {
            CustomQueryKind::AddressesDetailed => json!({
                "query": "query GetAddressDetailed($address: String!, $country: String) { getByAddress(address: $address, country: $country) { addresses { data { preciselyID addressNumber streetName city admin1ShortName postalCode } } } }",
                "variables": {"address": "42 Valley Of The Sun Dr, Fairplay, CO 80440", "country": "US"}
            }),
            CustomQueryKind::ParcelByOwner => json!({
                "query": "query GetParcelByOwner($id: String, $queryType: QueryType, $address: String, $distance: Float, $limit: Int) { getParcelByOwner(id: $id, queryType: $queryType, address: $address, distance: $distance, limit: $limit) { parcels { metadata { pageNumber pageCount totalPages count vintage } data { parcelID fips geographyID apn parcelArea longitude latitude elevation } } } }",
                "variables": {"id": "P0000GL41OME", "queryType": "PRECISELY_ID", "address": "Boston, MA", "distance": 1000.0, "limit": 50}
            }),
            CustomQueryKind::AddressFamily => json!({
                "query": "query GetAddressFamily($id: String!, $queryType: QueryType!) { getById(id: $id, queryType: $queryType) { addresses { data { preciselyID addressFamily(pageNumber: 1, pageSize: 20) { metadata { pageNumber pageCount totalPages count vintage } data { preciselyID addressNumber streetName city admin1ShortName postalCode } } } } } }",
                "variables": {"id": "P0000GL41OME", "queryType": "PRECISELY_ID"}
            }),
            CustomQueryKind::Serviceability => json!({
                "query": "query GetServiceability($address: String!, $country: String) { getByAddress(address: $address, country: $country) { addresses(pageNumber: 1, pageSize: 1) { data { preciselyID serviceability { metadata { pageNumber pageCount totalPages count vintage } data { serviceabilityID preciselyID serviceableAddress } } } } } }",
                "variables": {"address": EXAMPLE_ADDRESS, "country": "US"}
            }),
            CustomQueryKind::PlacesByAddress => json!({
                "query": "query GetPlacesByAddress($address: String!, $country: String) { getByAddress(address: $address, country: $country) { places(pageNumber: 1, pageSize: 20) { metadata { pageNumber pageCount totalPages count vintage } data { PBID pointOfInterestID preciselyID businessName brandName city admin1ShortName postalCode formattedAddress longitude latitude phone web lineOfBusiness sic8Description } } } }",
                "variables": {"address": "123 Main St, Boston, MA 02101", "country": "US"}
            }),
        }
    }

    fn data_description(&self) -> &'static str {
        match self {
            CustomQueryKind::ParcelByOwner => "GraphQL query with variables: id (string), queryType (PRECISELY_ID|ADDRESS|LOCATION), address (string), distance (float), limit (int)",
            CustomQueryKind::AddressFamily => "GraphQL query with variables: id (string, required), queryType (must be 'PRECISELY_ID')",
            CustomQueryKind::AddressesDetailed
            | CustomQueryKind::Serviceability
            | CustomQueryKind::PlacesByAddress => {
                "GraphQL query object with 'query' and 'variables' (address, country default 'US')"
            }
        }
    }

    /// Check `variables.queryType` for the queries that take one.
    fn check_query_type(&self, request: &GraphQlRequest) -> Result<(), ValidationError> {
        match self {
            CustomQueryKind::ParcelByOwner => {
                request.query_type()?;
            }
            CustomQueryKind::AddressFamily => match request.query_type()? {
                None | Some(QueryType::PreciselyId) => {}
                Some(other) => {
                    return Err(ValidationError::NotAllowed {
                        field: "queryType",
                        value: other.to_string(),
                        expected: QueryType::PreciselyId.to_string(),
                    })
                }
            },
            _ => {}
        }
        Ok(())
    }
}

pub struct CustomGraphQlTool {
    client: LocintelClient,
    kind: CustomQueryKind,
}

impl CustomGraphQlTool {
    pub fn new(client: LocintelClient, kind: CustomQueryKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, data: Value) -> LocintelResult<GraphQlResponse> {
        let request = GraphQlRequest::from_value(data)?;
        self.kind.check_query_type(&request)?;
        self.client.data_graph().execute(&request).await
    }
}

#[derive(Debug, Deserialize)]
struct CustomGraphQlArgs {
    data: Value,
}

#[async_trait::async_trait]
impl Tool for CustomGraphQlTool {
    fn schema(&self) -> ToolSchema {
        let example = json!({ "data": self.kind.example() });
        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: format!("{}\n\nExample request:\n{}", self.kind.summary(), example),
            input_schema: json_schema_object(
                json!({"data": json_schema_any_object(self.kind.data_description())}),
                vec!["data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CustomGraphQlArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond_graphql(self.run(args.data).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::DataGraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{envelope_of, test_client};
    use std::collections::HashSet;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_tool_names_are_unique() {
        let names: HashSet<&str> = DataGraphQuery::ALL.iter().map(|q| tool_name(*q)).collect();
        assert_eq!(names.len(), DataGraphQuery::ALL.len());
    }

    #[tokio::test]
    async fn test_flood_risk_defaults_country() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .and(body_partial_json(json!({
                "variables": {"address": EXAMPLE_ADDRESS, "country": "US"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getByAddress": {"floodRisk": {"data": [{"floodZone": "X"}]}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = DataGraphTool::new(test_client(&server), DataGraphQuery::FloodRisk);
        let result = tool.execute(json!({ "address": EXAMPLE_ADDRESS })).await.unwrap();

        let envelope = envelope_of(&result);
        assert!(envelope.success);
        assert_eq!(
            envelope.data.unwrap()["data"]["getByAddress"]["floodRisk"]["data"][0]["floodZone"],
            "X"
        );
    }

    #[tokio::test]
    async fn test_graphql_errors_without_data_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{"message": "Address not found", "path": ["getByAddress"]}]
            })))
            .mount(&server)
            .await;

        let tool = DataGraphTool::new(test_client(&server), DataGraphQuery::Schools);
        let result = tool.execute(json!({"address": "nowhere"})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        let envelope = envelope_of(&result);
        assert_eq!(envelope.error.as_deref(), Some("Address not found"));
        assert_eq!(envelope.details.unwrap()[0]["path"][0], "getByAddress");
    }

    #[tokio::test]
    async fn test_address_family_rejects_other_query_types() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(0)
            .mount(&server)
            .await;

        let tool = CustomGraphQlTool::new(test_client(&server), CustomQueryKind::AddressFamily);
        let result = tool
            .execute(json!({"data": {
                "query": "query Q($id: String!) { getById(id: $id) { addresses { data { preciselyID } } } }",
                "variables": {"id": "P0000GL41OME", "queryType": "ADDRESS"}
            }}))
            .await
            .unwrap();

        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("invalid queryType 'ADDRESS', expected one of: PRECISELY_ID")
        );
    }

    #[tokio::test]
    async fn test_parcel_by_owner_forwards_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .and(body_partial_json(json!({
                "variables": {"id": "P0000GL41OME", "queryType": "LOCATION"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getParcelByOwner": {"parcels": {"data": [{"apn": "123-45"}]}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CustomGraphQlTool::new(test_client(&server), CustomQueryKind::ParcelByOwner);
        let result = tool
            .execute(json!({"data": {
                "query": "query P($id: String, $queryType: QueryType) { getParcelByOwner(id: $id, queryType: $queryType) { parcels { data { apn } } } }",
                "variables": {"id": "P0000GL41OME", "queryType": "LOCATION"}
            }}))
            .await
            .unwrap();
        assert!(envelope_of(&result).success);
    }

    #[tokio::test]
    async fn test_custom_query_requires_query_text() {
        let server = MockServer::start().await;
        let tool = CustomGraphQlTool::new(test_client(&server), CustomQueryKind::Serviceability);
        let result = tool.execute(json!({"data": {"variables": {}}})).await.unwrap();

        let envelope = envelope_of(&result);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().starts_with("invalid GraphQL request"));
    }
}
