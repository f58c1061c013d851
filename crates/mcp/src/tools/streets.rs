// Intersections and speed limits

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{option, parse_args, point, required, AxisOrder, NumberOrString, PointList};
use crate::tools::envelope::respond;
use crate::tools::{
    json_schema_enum, json_schema_integer, json_schema_number, json_schema_object,
    json_schema_string, Tool, ToolCategory,
};
use anyhow::Result;
use locintel_core::validate::{DriveTimeUnit, HistoricSpeed, RoadClass, SearchRadiusUnit};
use locintel_core::ValidationError;
use locintel_sdk::{IntersectionOptions, LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    Address,
    Location,
}

impl IntersectionKind {
    pub const ALL: [IntersectionKind; 2] = [IntersectionKind::Address, IntersectionKind::Location];

    fn tool_name(&self) -> &'static str {
        match self {
            IntersectionKind::Address => "get_intersection_by_address",
            IntersectionKind::Location => "get_intersection_by_location",
        }
    }
}

pub struct IntersectionTool {
    client: LocintelClient,
    kind: IntersectionKind,
}

impl IntersectionTool {
    pub fn new(client: LocintelClient, kind: IntersectionKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, args: IntersectionArgs) -> Result<LocintelResult<Value>> {
        let name = self.kind.tool_name();
        let options = match args.options() {
            Ok(options) => options,
            Err(e) => return Ok(Err(e.into())),
        };
        let api = self.client.streets();

        let result = match self.kind {
            IntersectionKind::Address => {
                let address = required(name, "address", args.address)?;
                api.intersection_by_address(&address, &options).await
            }
            IntersectionKind::Location => {
                let lat = required(name, "latitude", args.latitude)?;
                let lon = required(name, "longitude", args.longitude)?;
                match point(&lat, &lon) {
                    Ok(point) => api.intersection_by_location(point, &options).await,
                    Err(e) => Err(e.into()),
                }
            }
        };
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct IntersectionArgs {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latitude: Option<NumberOrString>,
    #[serde(default)]
    longitude: Option<NumberOrString>,
    #[serde(default)]
    road_class: Option<String>,
    #[serde(default)]
    drive_time: Option<f64>,
    #[serde(default)]
    drive_time_unit: Option<String>,
    #[serde(default)]
    search_radius: Option<f64>,
    #[serde(default)]
    search_radius_unit: Option<String>,
    #[serde(default)]
    historic_speed: Option<String>,
    #[serde(default)]
    max_candidates: Option<u32>,
}

impl IntersectionArgs {
    fn options(&self) -> Result<IntersectionOptions, ValidationError> {
        Ok(IntersectionOptions {
            road_class: option::<RoadClass>(self.road_class.as_deref())?,
            drive_time: self.drive_time,
            drive_time_unit: option::<DriveTimeUnit>(self.drive_time_unit.as_deref())?,
            search_radius: self.search_radius,
            search_radius_unit: option::<SearchRadiusUnit>(self.search_radius_unit.as_deref())?,
            historic_speed: option::<HistoricSpeed>(self.historic_speed.as_deref())?,
            max_candidates: self.max_candidates,
        })
    }
}

#[async_trait::async_trait]
impl Tool for IntersectionTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = Map::new();
        let required = match self.kind {
            IntersectionKind::Address => {
                properties.insert("address".to_string(), json_schema_string("Full address"));
                vec!["address"]
            }
            IntersectionKind::Location => {
                properties.insert("latitude".to_string(), json_schema_number("Latitude"));
                properties.insert("longitude".to_string(), json_schema_number("Longitude"));
                vec!["latitude", "longitude"]
            }
        };
        properties.insert(
            "road_class".to_string(),
            json_schema_enum("Road class filter", RoadClass::ALLOWED),
        );
        properties.insert(
            "drive_time".to_string(),
            json_schema_number("Maximum drive time to the intersection"),
        );
        properties.insert(
            "drive_time_unit".to_string(),
            json_schema_enum("Unit of drive_time", DriveTimeUnit::ALLOWED),
        );
        properties.insert(
            "search_radius".to_string(),
            json_schema_number("Search radius, 50 miles when omitted"),
        );
        properties.insert(
            "search_radius_unit".to_string(),
            json_schema_enum("Unit of search_radius", SearchRadiusUnit::ALLOWED),
        );
        properties.insert(
            "historic_speed".to_string(),
            json_schema_enum("Traffic period for drive times", HistoricSpeed::ALLOWED),
        );
        properties.insert(
            "max_candidates".to_string(),
            json_schema_integer("Maximum intersections returned", 1, 100),
        );

        let description = match self.kind {
            IntersectionKind::Address => {
                "Find the nearest intersection to an address. Example: {'address': '1 Global View, Troy, NY', 'road_class': 'Major', 'max_candidates': 2}"
            }
            IntersectionKind::Location => {
                "Find the nearest intersection to a coordinate. Example: {'latitude': 42.6835, 'longitude': -73.7042, 'search_radius': 5, 'search_radius_unit': 'miles'}"
            }
        };

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(Value::Object(properties), required),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: IntersectionArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond(self.run(args).await?))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Streets
    }
}

pub struct SpeedLimitTool {
    client: LocintelClient,
}

#[derive(Debug, Deserialize)]
struct SpeedLimitArgs {
    path: PointList,
}

impl SpeedLimitTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for SpeedLimitTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_nearest_speed_limit".to_string(),
            description: "Get the posted speed limit of the road nearest to a path of points given as longitude,latitude pairs. Example: {'path': '-122.4194,37.7749;-122.4094,37.7849'}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "path": {
                        "oneOf": [
                            {"type": "string", "description": "'lon,lat;lon,lat'"},
                            {"type": "array", "items": {"type": "array", "items": {"type": "number"}, "minItems": 2, "maxItems": 2}}
                        ]
                    }
                }),
                vec!["path"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: SpeedLimitArgs = parse_args("get_nearest_speed_limit", arguments)?;
        let result = match args.path.coordinates(AxisOrder::LonLat) {
            Ok(path) => self.client.streets().nearest_speed_limit(&path).await,
            Err(e) => Err(e.into()),
        };
        Ok(respond(result))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Streets
    }
}
