// Checks answered without calling the vendor

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{parse_args, NumberOrString};
use crate::tools::envelope::{failure, success};
use crate::tools::{json_schema_number, json_schema_object, Tool, ToolCategory};
use anyhow::Result;
use locintel_core::CoordinateCheck;
use serde::Deserialize;
use serde_json::{json, Value};

/// Range-check a latitude/longitude pair
pub struct ValidateCoordinatesTool;

#[derive(Debug, Deserialize)]
struct CoordinateArgs {
    latitude: NumberOrString,
    longitude: NumberOrString,
}

#[async_trait::async_trait]
impl Tool for ValidateCoordinatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "validate_coordinates".to_string(),
            description: "Check that a latitude/longitude pair is in range before using it. Example: {'latitude': 42.3601, 'longitude': -71.0589}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "latitude": json_schema_number("Latitude in degrees"),
                    "longitude": json_schema_number("Longitude in degrees")
                }),
                vec!["latitude", "longitude"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CoordinateArgs = parse_args("validate_coordinates", arguments)?;

        let latitude = args.latitude.coordinate("latitude");
        let longitude = args.longitude.coordinate("longitude");
        match (latitude, longitude) {
            (Ok(lat), Ok(lon)) => Ok(success(CoordinateCheck::run(lat, lon))),
            (Err(e), _) | (_, Err(e)) => Ok(failure(e.to_string())),
        }
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::envelope_of;

    #[tokio::test]
    async fn test_valid_pair() {
        let result = ValidateCoordinatesTool
            .execute(json!({"latitude": 42.3601, "longitude": -71.0589}))
            .await
            .unwrap();

        let data = envelope_of(&result).data.unwrap();
        assert_eq!(data["valid"], true);
        assert_eq!(data["latitude"], 42.3601);
    }

    #[tokio::test]
    async fn test_out_of_range_is_reported_not_failed() {
        let result = ValidateCoordinatesTool
            .execute(json!({"latitude": "91", "longitude": 0}))
            .await
            .unwrap();

        let envelope = envelope_of(&result);
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()["valid"], false);
    }

    #[tokio::test]
    async fn test_unparseable_input_fails() {
        let result = ValidateCoordinatesTool
            .execute(json!({"latitude": "north", "longitude": 0}))
            .await
            .unwrap();
        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("latitude is not a valid number: 'north'")
        );
    }
}
