//! Data graph (GraphQL) endpoint and the canned per-address queries.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::{require_non_empty, validate_country, validate_graphql_request, QueryType};
use locintel_core::{GraphQlResponse, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

const GRAPHQL_PATH: &str = "/data-graph/graphql";

/// Country used by the canned queries when the caller gives none.
pub const DEFAULT_DATA_GRAPH_COUNTRY: &str = "US";

/// A GraphQL request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Accept a caller-supplied `{"query", "variables"}` object after checking its shape.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate_graphql_request(&value)?;
        serde_json::from_value(value).map_err(|e| ValidationError::GraphQl(e.to_string()))
    }

    /// The `queryType` variable, checked against the allowed values.
    pub fn query_type(&self) -> Result<Option<QueryType>, ValidationError> {
        match self.variables.as_ref().and_then(|v| v.get("queryType")) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => QueryType::from_str(s).map(Some),
            Some(other) => QueryType::from_str(&other.to_string()).map(Some),
        }
    }
}

/// The per-address reports available through [`DataGraphApi::by_address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataGraphQuery {
    PropertyData,
    PropertyAttributes,
    ReplacementCost,
    FloodRisk,
    WildfireRisk,
    PropertyFireRisk,
    EarthRisk,
    CoastalRisk,
    HistoricalWeatherRisk,
    Demographics,
    CrimeIndex,
    PsyteGeodemographics,
    GroundView,
    Neighborhoods,
    Schools,
    Buildings,
    Parcels,
}

impl DataGraphQuery {
    pub const ALL: [DataGraphQuery; 17] = [
        DataGraphQuery::PropertyData,
        DataGraphQuery::PropertyAttributes,
        DataGraphQuery::ReplacementCost,
        DataGraphQuery::FloodRisk,
        DataGraphQuery::WildfireRisk,
        DataGraphQuery::PropertyFireRisk,
        DataGraphQuery::EarthRisk,
        DataGraphQuery::CoastalRisk,
        DataGraphQuery::HistoricalWeatherRisk,
        DataGraphQuery::Demographics,
        DataGraphQuery::CrimeIndex,
        DataGraphQuery::PsyteGeodemographics,
        DataGraphQuery::GroundView,
        DataGraphQuery::Neighborhoods,
        DataGraphQuery::Schools,
        DataGraphQuery::Buildings,
        DataGraphQuery::Parcels,
    ];

    /// GraphQL document taking `$address: String!` and `$country: String`.
    pub fn document(&self) -> &'static str {
        match self {
            DataGraphQuery::PropertyData => include_str!("../../queries/property_data.graphql"),
            DataGraphQuery::PropertyAttributes => {
                include_str!("../../queries/property_attributes.graphql")
            }
            DataGraphQuery::ReplacementCost => include_str!("../../queries/replacement_cost.graphql"),
            DataGraphQuery::FloodRisk => include_str!("../../queries/flood_risk.graphql"),
            DataGraphQuery::WildfireRisk => include_str!("../../queries/wildfire_risk.graphql"),
            DataGraphQuery::PropertyFireRisk => {
                include_str!("../../queries/property_fire_risk.graphql")
            }
            DataGraphQuery::EarthRisk => include_str!("../../queries/earth_risk.graphql"),
            DataGraphQuery::CoastalRisk => include_str!("../../queries/coastal_risk.graphql"),
            DataGraphQuery::HistoricalWeatherRisk => {
                include_str!("../../queries/historical_weather_risk.graphql")
            }
            DataGraphQuery::Demographics => include_str!("../../queries/demographics.graphql"),
            DataGraphQuery::CrimeIndex => include_str!("../../queries/crime_index.graphql"),
            DataGraphQuery::PsyteGeodemographics => {
                include_str!("../../queries/psyte_geodemographics.graphql")
            }
            DataGraphQuery::GroundView => include_str!("../../queries/ground_view.graphql"),
            DataGraphQuery::Neighborhoods => include_str!("../../queries/neighborhoods.graphql"),
            DataGraphQuery::Schools => include_str!("../../queries/schools.graphql"),
            DataGraphQuery::Buildings => include_str!("../../queries/buildings.graphql"),
            DataGraphQuery::Parcels => include_str!("../../queries/parcels.graphql"),
        }
    }

    /// Human-readable label used in tool descriptions and logs.
    pub fn label(&self) -> &'static str {
        match self {
            DataGraphQuery::PropertyData => "property information",
            DataGraphQuery::PropertyAttributes => "property attributes",
            DataGraphQuery::ReplacementCost => "replacement cost",
            DataGraphQuery::FloodRisk => "flood risk",
            DataGraphQuery::WildfireRisk => "wildfire risk",
            DataGraphQuery::PropertyFireRisk => "property fire risk and nearest fire stations",
            DataGraphQuery::EarthRisk => "earthquake risk",
            DataGraphQuery::CoastalRisk => "coastal and hurricane wind risk",
            DataGraphQuery::HistoricalWeatherRisk => "historical weather risk",
            DataGraphQuery::Demographics => "demographics",
            DataGraphQuery::CrimeIndex => "crime index",
            DataGraphQuery::PsyteGeodemographics => "PSYTE geodemographic segmentation",
            DataGraphQuery::GroundView => "GroundView census block group demographics",
            DataGraphQuery::Neighborhoods => "neighborhoods",
            DataGraphQuery::Schools => "schools and school districts",
            DataGraphQuery::Buildings => "buildings",
            DataGraphQuery::Parcels => "parcels",
        }
    }

    pub fn request(&self, address: &str, country: &str) -> GraphQlRequest {
        GraphQlRequest::new(self.document())
            .variable("address", address)
            .variable("country", country)
    }
}

/// Data graph API.
pub struct DataGraphApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> DataGraphApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    /// Run one of the canned per-address queries.
    pub async fn by_address(
        &self,
        query: DataGraphQuery,
        address: &str,
        country: Option<&str>,
    ) -> LocintelResult<GraphQlResponse> {
        let address = require_non_empty("address", address)?;
        let country = validate_country(country.unwrap_or(DEFAULT_DATA_GRAPH_COUNTRY))?;
        debug!(query = ?query, "Data graph lookup");
        self.execute(&query.request(address, &country)).await
    }

    /// Run an arbitrary GraphQL request.
    pub async fn execute(&self, request: &GraphQlRequest) -> LocintelResult<GraphQlResponse> {
        if request.query.trim().is_empty() {
            return Err(ValidationError::GraphQl("'query' must not be empty".to_string()).into());
        }
        self.client.http.post_json(GRAPHQL_PATH, request).await
    }

    /// Run a caller-supplied `{"query", "variables"}` object.
    pub async fn execute_value(&self, body: Value) -> LocintelResult<GraphQlResponse> {
        let request = GraphQlRequest::from_value(body)?;
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_every_document_takes_address_and_country() {
        for query in DataGraphQuery::ALL {
            let doc = query.document();
            assert!(doc.trim_start().starts_with("query "), "{:?}", query);
            assert!(doc.contains("$address: String!"), "{:?}", query);
            assert!(doc.contains("$country: String"), "{:?}", query);
            assert!(
                doc.contains("getByAddress(address: $address, country: $country)"),
                "{:?}",
                query
            );
            assert_eq!(doc.matches('{').count(), doc.matches('}').count(), "{:?}", query);
        }
    }

    #[test]
    fn test_request_from_value() {
        let request = GraphQlRequest::from_value(json!({
            "query": "query Q($id: String) { getById(id: $id) { addresses { data { preciselyID } } } }",
            "variables": {"id": "P0000GL41OME", "queryType": "precisely_id"}
        }))
        .unwrap();
        assert_eq!(request.query_type().unwrap(), Some(QueryType::PreciselyId));

        let bad = GraphQlRequest::new("query { x }").variable("queryType", "PARCEL");
        assert!(bad.query_type().is_err());

        assert!(GraphQlRequest::from_value(json!({"variables": {}})).is_err());
        assert!(GraphQlRequest::from_value(json!({"query": "  "})).is_err());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let mut request = DataGraphQuery::Parcels.request("Boston, MA", "US");
        request.operation_name = Some("GetParcels".to_string());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["variables"], json!({"address": "Boston, MA", "country": "US"}));
        assert_eq!(value["operationName"], "GetParcels");
    }

    #[tokio::test]
    async fn test_by_address_posts_canned_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .and(body_partial_json(json!({
                "query": DataGraphQuery::FloodRisk.document(),
                "variables": {"address": "42 Valley Of The Sun Dr, Fairplay, CO 80440", "country": "US"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getByAddress": {"addresses": {"data": [{"preciselyID": "P0000GL41OME"}]}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .data_graph()
            .by_address(
                DataGraphQuery::FloodRisk,
                "42 Valley Of The Sun Dr, Fairplay, CO 80440",
                None,
            )
            .await
            .unwrap();
        assert!(!response.is_failure());
    }

    #[tokio::test]
    async fn test_graphql_errors_come_back_as_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/data-graph/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{"message": "Validation error of type FieldUndefined"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .data_graph()
            .execute_value(json!({"query": "query { nope }"}))
            .await
            .unwrap();
        assert!(response.is_failure());
        assert_eq!(response.error_summary(), "Validation error of type FieldUndefined");
    }
}
