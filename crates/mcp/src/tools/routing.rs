// Routes and travel cost matrices

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{option, parse_args, point, required, AddressList, AxisOrder, NumberOrString, PointList};
use crate::tools::envelope::respond;
use crate::tools::{
    json_schema_enum, json_schema_number, json_schema_object, json_schema_string, Tool, ToolCategory,
};
use anyhow::Result;
use locintel_core::validate::{OptimizeBy, TravelMode};
use locintel_core::ValidationError;
use locintel_sdk::{LocintelClient, LocintelResult, RouteOptions};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    ByAddress,
    ByLocation,
    MatrixByAddress,
    MatrixByLocation,
}

impl RouteKind {
    pub const ALL: [RouteKind; 4] = [
        RouteKind::ByAddress,
        RouteKind::ByLocation,
        RouteKind::MatrixByAddress,
        RouteKind::MatrixByLocation,
    ];

    fn tool_name(&self) -> &'static str {
        match self {
            RouteKind::ByAddress => "get_route_by_address",
            RouteKind::ByLocation => "get_route_by_location",
            RouteKind::MatrixByAddress => "get_travel_cost_matrix_by_address",
            RouteKind::MatrixByLocation => "get_travel_cost_matrix_by_location",
        }
    }

    fn is_matrix(&self) -> bool {
        matches!(self, RouteKind::MatrixByAddress | RouteKind::MatrixByLocation)
    }
}

pub struct RouteTool {
    client: LocintelClient,
    kind: RouteKind,
}

impl RouteTool {
    pub fn new(client: LocintelClient, kind: RouteKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, args: RouteArgs) -> Result<LocintelResult<Value>> {
        let name = self.kind.tool_name();
        let options = match args.options() {
            Ok(options) => options,
            Err(e) => return Ok(Err(e.into())),
        };
        let api = self.client.routing();

        let result = match self.kind {
            RouteKind::ByAddress => {
                let start = required(name, "start_address", args.start_address)?;
                let end = required(name, "end_address", args.end_address)?;
                let via = args
                    .intermediate_addresses
                    .map(AddressList::into_vec)
                    .unwrap_or_default();
                api.route_by_address(&start, &end, &via, args.country.as_deref(), &options)
                    .await
            }
            RouteKind::ByLocation => {
                let start_lat = required(name, "start_latitude", args.start_latitude)?;
                let start_lon = required(name, "start_longitude", args.start_longitude)?;
                let end_lat = required(name, "end_latitude", args.end_latitude)?;
                let end_lon = required(name, "end_longitude", args.end_longitude)?;
                let points = point(&start_lat, &start_lon).and_then(|start| {
                    let end = point(&end_lat, &end_lon)?;
                    let via = match &args.intermediate_points {
                        Some(list) => list.coordinates(AxisOrder::LatLon)?,
                        None => Vec::new(),
                    };
                    Ok((start, end, via))
                });
                match points {
                    Ok((start, end, via)) => api.route_by_location(start, end, &via, &options).await,
                    Err(e) => Err(e.into()),
                }
            }
            RouteKind::MatrixByAddress => {
                let starts = required(name, "start_addresses", args.start_addresses)?.into_vec();
                let ends = required(name, "end_addresses", args.end_addresses)?.into_vec();
                api.travel_cost_matrix_by_address(&starts, &ends, args.country.as_deref(), &options)
                    .await
            }
            RouteKind::MatrixByLocation => {
                let starts = required(name, "start_points", args.start_points)?;
                let ends = required(name, "end_points", args.end_points)?;
                let points = starts
                    .coordinates(AxisOrder::LatLon)
                    .and_then(|s| Ok((s, ends.coordinates(AxisOrder::LatLon)?)));
                match points {
                    Ok((starts, ends)) => {
                        api.travel_cost_matrix_by_location(&starts, &ends, &options).await
                    }
                    Err(e) => Err(e.into()),
                }
            }
        };
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct RouteArgs {
    #[serde(default)]
    start_address: Option<String>,
    #[serde(default)]
    end_address: Option<String>,
    #[serde(default)]
    intermediate_addresses: Option<AddressList>,
    #[serde(default)]
    start_latitude: Option<NumberOrString>,
    #[serde(default)]
    start_longitude: Option<NumberOrString>,
    #[serde(default)]
    end_latitude: Option<NumberOrString>,
    #[serde(default)]
    end_longitude: Option<NumberOrString>,
    #[serde(default)]
    intermediate_points: Option<PointList>,
    #[serde(default)]
    start_addresses: Option<AddressList>,
    #[serde(default)]
    end_addresses: Option<AddressList>,
    #[serde(default)]
    start_points: Option<PointList>,
    #[serde(default)]
    end_points: Option<PointList>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    db: Option<String>,
    #[serde(default)]
    optimize_by: Option<String>,
    #[serde(default)]
    return_distance: Option<bool>,
    #[serde(default)]
    distance_unit: Option<String>,
    #[serde(default)]
    return_time: Option<bool>,
    #[serde(default)]
    time_unit: Option<String>,
    #[serde(default)]
    major_roads: Option<bool>,
    #[serde(default)]
    return_optimal_routes_only: Option<bool>,
}

impl RouteArgs {
    fn options(&self) -> Result<RouteOptions, ValidationError> {
        Ok(RouteOptions {
            db: option::<TravelMode>(self.db.as_deref())?,
            optimize_by: option::<OptimizeBy>(self.optimize_by.as_deref())?,
            return_distance: self.return_distance,
            distance_unit: self.distance_unit.clone(),
            return_time: self.return_time,
            time_unit: self.time_unit.clone(),
            major_roads: self.major_roads,
            return_optimal_routes_only: self.return_optimal_routes_only,
        })
    }
}

fn common_properties(properties: &mut Map<String, Value>, matrix: bool) {
    properties.insert(
        "db".to_string(),
        json_schema_enum("Mode of travel", TravelMode::ALLOWED),
    );
    properties.insert(
        "optimize_by".to_string(),
        json_schema_enum("Minimize time or distance", OptimizeBy::ALLOWED),
    );
    properties.insert("return_distance".to_string(), json!({"type": "boolean"}));
    properties.insert(
        "distance_unit".to_string(),
        json_schema_string("Distance unit, e.g. m, km, mi"),
    );
    properties.insert("return_time".to_string(), json!({"type": "boolean"}));
    properties.insert(
        "time_unit".to_string(),
        json_schema_string("Time unit, e.g. min, h, s"),
    );
    properties.insert("major_roads".to_string(), json!({"type": "boolean"}));
    if matrix {
        properties.insert(
            "return_optimal_routes_only".to_string(),
            json!({"type": "boolean"}),
        );
    }
}

#[async_trait::async_trait]
impl Tool for RouteTool {
    fn schema(&self) -> ToolSchema {
        let addresses = json!({
            "oneOf": [
                {"type": "string", "description": "Addresses separated by ';'"},
                {"type": "array", "items": {"type": "string"}}
            ]
        });
        let points = json!({
            "oneOf": [
                {"type": "string", "description": "'lat,lon;lat,lon'"},
                {"type": "array", "items": {"type": "array", "items": {"type": "number"}, "minItems": 2, "maxItems": 2}}
            ]
        });

        let (description, properties, required) = match self.kind {
            RouteKind::ByAddress => (
                "Get route information between two addresses. Example: {'start_address': '4750 Walnut St, Boulder, CO', 'end_address': '1600 Pearl St, Boulder, CO', 'db': 'driving', 'optimize_by': 'time'}",
                json!({
                    "start_address": json_schema_string("Starting address"),
                    "end_address": json_schema_string("Ending address"),
                    "intermediate_addresses": addresses.clone(),
                    "country": json_schema_string("3-letter ISO country code")
                }),
                vec!["start_address", "end_address"],
            ),
            RouteKind::ByLocation => (
                "Get route information between two coordinates. Example: {'start_latitude': 40.7128, 'start_longitude': -74.006, 'end_latitude': 42.3601, 'end_longitude': -71.0589}",
                json!({
                    "start_latitude": json_schema_number("Latitude of the starting point"),
                    "start_longitude": json_schema_number("Longitude of the starting point"),
                    "end_latitude": json_schema_number("Latitude of the ending point"),
                    "end_longitude": json_schema_number("Longitude of the ending point"),
                    "intermediate_points": points.clone()
                }),
                vec!["start_latitude", "start_longitude", "end_latitude", "end_longitude"],
            ),
            RouteKind::MatrixByAddress => (
                "Get travel cost matrix (distances and times) between multiple addresses. Example: {'start_addresses': ['Boulder, CO', 'Denver, CO'], 'end_addresses': ['Golden, CO']}",
                json!({
                    "start_addresses": addresses.clone(),
                    "end_addresses": addresses,
                    "country": json_schema_string("3-letter ISO country code")
                }),
                vec!["start_addresses", "end_addresses"],
            ),
            RouteKind::MatrixByLocation => (
                "Get travel cost matrix (distances and times) between multiple coordinate pairs. Example: {'start_points': [[40.7128, -74.006]], 'end_points': [[42.3601, -71.0589], [41.8781, -87.6298]]}",
                json!({
                    "start_points": points.clone(),
                    "end_points": points
                }),
                vec!["start_points", "end_points"],
            ),
        };

        let mut properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        common_properties(&mut properties, self.kind.is_matrix());

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(Value::Object(properties), required),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: RouteArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond(self.run(args).await?))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Routing
    }
}
