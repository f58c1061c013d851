// Crime risk and natural hazard history

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{option, parse_args, point, required, NumberOrString};
use crate::tools::envelope::respond;
use crate::tools::{
    json_schema_enum, json_schema_number, json_schema_object, json_schema_string, Tool,
    ToolCategory,
};
use anyhow::Result;
use locintel_core::validate::RiskType;
use locintel_sdk::{CrimeRiskOptions, HistoryFilter, LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrimeRiskKind {
    Address,
    Location,
}

impl CrimeRiskKind {
    pub const ALL: [CrimeRiskKind; 2] = [CrimeRiskKind::Address, CrimeRiskKind::Location];

    fn tool_name(&self) -> &'static str {
        match self {
            CrimeRiskKind::Address => "get_crime_risk_by_address",
            CrimeRiskKind::Location => "get_crime_risk_by_location",
        }
    }
}

pub struct CrimeRiskTool {
    client: LocintelClient,
    kind: CrimeRiskKind,
}

#[derive(Debug, Deserialize)]
struct CrimeRiskArgs {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latitude: Option<NumberOrString>,
    #[serde(default)]
    longitude: Option<NumberOrString>,
    #[serde(default)]
    risk_type: Option<String>,
    #[serde(default)]
    include_geometry: bool,
}

impl CrimeRiskTool {
    pub fn new(client: LocintelClient, kind: CrimeRiskKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, args: CrimeRiskArgs) -> Result<LocintelResult<Value>> {
        let name = self.kind.tool_name();
        let options = match option::<RiskType>(args.risk_type.as_deref()) {
            Ok(risk_type) => CrimeRiskOptions {
                risk_type,
                include_geometry: args.include_geometry,
            },
            Err(e) => return Ok(Err(e.into())),
        };
        let api = self.client.risks();

        let result = match self.kind {
            CrimeRiskKind::Address => {
                let address = required(name, "address", args.address)?;
                api.crime_by_address(&address, &options).await
            }
            CrimeRiskKind::Location => {
                let lat = required(name, "latitude", args.latitude)?;
                let lon = required(name, "longitude", args.longitude)?;
                match point(&lat, &lon) {
                    Ok(point) => api.crime_by_location(point, &options).await,
                    Err(e) => Err(e.into()),
                }
            }
        };
        Ok(result)
    }
}

#[async_trait::async_trait]
impl Tool for CrimeRiskTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = Map::new();
        let (description, required) = match self.kind {
            CrimeRiskKind::Address => {
                properties.insert("address".to_string(), json_schema_string("Full address"));
                (
                    "Get crime risk indexes for an address. Example: {'address': '1 Global View, Troy, NY', 'risk_type': 'property'}",
                    vec!["address"],
                )
            }
            CrimeRiskKind::Location => {
                properties.insert("latitude".to_string(), json_schema_number("Latitude"));
                properties.insert("longitude".to_string(), json_schema_number("Longitude"));
                (
                    "Get crime risk indexes for a coordinate. Example: {'latitude': 42.6835, 'longitude': -73.7042}",
                    vec!["latitude", "longitude"],
                )
            }
        };
        properties.insert(
            "risk_type".to_string(),
            json_schema_enum("Crime category", RiskType::ALLOWED),
        );
        properties.insert(
            "include_geometry".to_string(),
            json!({"type": "boolean", "default": false}),
        );

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(Value::Object(properties), required),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CrimeRiskArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond(self.run(args).await?))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Risk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Earthquake,
    Fire,
}

impl HazardKind {
    pub const ALL: [HazardKind; 2] = [HazardKind::Earthquake, HazardKind::Fire];

    fn tool_name(&self) -> &'static str {
        match self {
            HazardKind::Earthquake => "get_earthquake_history",
            HazardKind::Fire => "get_fire_history",
        }
    }
}

pub struct HazardHistoryTool {
    client: LocintelClient,
    kind: HazardKind,
}

#[derive(Debug, Deserialize)]
struct HazardHistoryArgs {
    latitude: NumberOrString,
    longitude: NumberOrString,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    radius: Option<f64>,
    #[serde(default)]
    minimal_magnitude: Option<f64>,
}

impl HazardHistoryTool {
    pub fn new(client: LocintelClient, kind: HazardKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait::async_trait]
impl Tool for HazardHistoryTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = Map::new();
        properties.insert("latitude".to_string(), json_schema_number("Latitude"));
        properties.insert("longitude".to_string(), json_schema_number("Longitude"));
        properties.insert(
            "start_date".to_string(),
            json_schema_string("Start of the period, YYYY-MM-DD"),
        );
        properties.insert(
            "end_date".to_string(),
            json_schema_string("End of the period, YYYY-MM-DD"),
        );
        properties.insert(
            "radius".to_string(),
            json_schema_number("Search radius in miles"),
        );

        let description = match self.kind {
            HazardKind::Earthquake => {
                properties.insert(
                    "minimal_magnitude".to_string(),
                    json_schema_number("Smallest magnitude reported"),
                );
                "Get historical earthquakes around a coordinate. Example: {'latitude': 37.7749, 'longitude': -122.4194, 'start_date': '2010-01-01', 'minimal_magnitude': 4}"
            }
            HazardKind::Fire => {
                "Get historical wildfires around a coordinate. Example: {'latitude': 34.0522, 'longitude': -118.2437, 'radius': 25}"
            }
        };

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(Value::Object(properties), vec!["latitude", "longitude"]),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: HazardHistoryArgs = parse_args(self.kind.tool_name(), arguments)?;
        let filter = HistoryFilter {
            start_date: args.start_date,
            end_date: args.end_date,
            radius: args.radius,
            minimal_magnitude: args.minimal_magnitude,
        };

        let api = self.client.risks();
        let result = match point(&args.latitude, &args.longitude) {
            Ok(point) => match self.kind {
                HazardKind::Earthquake => api.earthquake_history(point, &filter).await,
                HazardKind::Fire => api.fire_history(point, &filter).await,
            },
            Err(e) => Err(e.into()),
        };
        Ok(respond(result))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Risk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{envelope_of, test_client};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_crime_risk_by_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/risks/v1/crime/byaddress"))
            .and(query_param("address", "1 Global View, Troy, NY"))
            .and(query_param("type", "personal"))
            .and(query_param("includeGeometry", "Y"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "themes": [{"crimeIndexTheme": {"indexVariable": []}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CrimeRiskTool::new(test_client(&server), CrimeRiskKind::Address);
        let result = tool
            .execute(json!({
                "address": "1 Global View, Troy, NY",
                "risk_type": "Personal",
                "include_geometry": true
            }))
            .await
            .unwrap();
        assert!(envelope_of(&result).success);
    }

    #[tokio::test]
    async fn test_earthquake_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/risks/v1/earthquakehistory"))
            .and(query_param("latitude", "37.7749"))
            .and(query_param("longitude", "-122.4194"))
            .and(query_param("startDate", "2010-01-01"))
            .and(query_param("minimalMagnitude", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "eventsCount": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = HazardHistoryTool::new(test_client(&server), HazardKind::Earthquake);
        let result = tool
            .execute(json!({
                "latitude": 37.7749,
                "longitude": -122.4194,
                "start_date": "2010-01-01",
                "minimal_magnitude": 4
            }))
            .await
            .unwrap();
        assert_eq!(envelope_of(&result).data.unwrap()["eventsCount"], 3);
    }

    #[tokio::test]
    async fn test_fire_history_rejects_bad_dates() {
        let server = MockServer::start().await;
        let tool = HazardHistoryTool::new(test_client(&server), HazardKind::Fire);
        let result = tool
            .execute(json!({
                "latitude": 34.0522,
                "longitude": -118.2437,
                "end_date": "12/31/2020"
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("end_date must be a YYYY-MM-DD date, got '12/31/2020'")
        );
    }

    #[tokio::test]
    async fn test_unknown_risk_type_is_rejected() {
        let server = MockServer::start().await;
        let tool = CrimeRiskTool::new(test_client(&server), CrimeRiskKind::Location);
        let result = tool
            .execute(json!({"latitude": 42.68, "longitude": -73.7, "risk_type": "cyber"}))
            .await
            .unwrap();

        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("invalid risk_type 'cyber', expected one of: all, general, personal, property")
        );
    }
}
