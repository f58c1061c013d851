// Typed vendor records and their public field surface

use crate::normalize::{IntoResponseNode, Record, RecordField, ResponseNode};
use crate::validate::{validate_latitude, validate_longitude, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            latitude: validate_latitude(latitude)?,
            longitude: validate_longitude(longitude)?,
        })
    }

    /// GeoJSON order, as the vendor expects in `coordinates` arrays.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl Record for Coordinates {
    fn fields(&self) -> Vec<RecordField> {
        vec![
            RecordField::public("latitude", self.latitude),
            RecordField::public("longitude", self.longitude),
        ]
    }
}

impl IntoResponseNode for Coordinates {
    fn into_node(self) -> ResponseNode {
        ResponseNode::record(self)
    }
}

/// Outcome of checking a coordinate pair without calling the vendor
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateCheck {
    pub latitude: f64,
    pub longitude: f64,
    pub valid: bool,
    pub reason: Option<String>,
}

impl CoordinateCheck {
    pub fn run(latitude: f64, longitude: f64) -> Self {
        match Coordinates::new(latitude, longitude) {
            Ok(_) => Self {
                latitude,
                longitude,
                valid: true,
                reason: None,
            },
            Err(e) => Self {
                latitude,
                longitude,
                valid: false,
                reason: Some(e.to_string()),
            },
        }
    }
}

impl Record for CoordinateCheck {
    fn fields(&self) -> Vec<RecordField> {
        let mut fields = vec![
            RecordField::public("latitude", self.latitude),
            RecordField::public("longitude", self.longitude),
            RecordField::public("valid", self.valid),
        ];
        if let Some(reason) = &self.reason {
            fields.push(RecordField::public("reason", reason.as_str()));
        }
        fields
    }
}

impl IntoResponseNode for CoordinateCheck {
    fn into_node(self) -> ResponseNode {
        ResponseNode::record(self)
    }
}

/// Response body of the data-graph GraphQL endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// No data came back and the server reported why.
    pub fn is_failure(&self) -> bool {
        self.data.as_ref().map_or(true, Value::is_null) && self.has_errors()
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Record for GraphQlResponse {
    fn fields(&self) -> Vec<RecordField> {
        let mut fields = vec![RecordField::public("data", self.data.clone())];
        if self.has_errors() {
            fields.push(RecordField::public("errors", self.errors.clone()));
        }
        // Tracing and cost metadata from the gateway
        fields.push(RecordField::internal("extensions", self.extensions.clone()));
        fields
    }
}

impl IntoResponseNode for GraphQlResponse {
    fn into_node(self) -> ResponseNode {
        ResponseNode::record(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl Record for GraphQlError {
    fn fields(&self) -> Vec<RecordField> {
        vec![
            RecordField::public("message", self.message.clone()),
            RecordField::public("path", self.path.clone()),
            RecordField::public("locations", self.locations.clone()),
            RecordField::public("extensions", self.extensions.clone()),
        ]
    }
}

impl IntoResponseNode for GraphQlError {
    fn into_node(self) -> ResponseNode {
        ResponseNode::record(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlLocation {
    pub line: u32,
    pub column: u32,
}

impl Record for GraphQlLocation {
    fn fields(&self) -> Vec<RecordField> {
        vec![
            RecordField::public("line", self.line),
            RecordField::public("column", self.column),
        ]
    }
}

impl IntoResponseNode for GraphQlLocation {
    fn into_node(self) -> ResponseNode {
        ResponseNode::record(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_value;
    use serde_json::json;

    #[test]
    fn test_coordinates_validate_on_construction() {
        let point = Coordinates::new(39.5501, -105.9999).unwrap();
        assert_eq!(point.lon_lat(), [-105.9999, 39.5501]);
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_coordinate_check_record() {
        assert_eq!(
            normalize_value(CoordinateCheck::run(42.36, -71.06)),
            json!({"latitude": 42.36, "longitude": -71.06, "valid": true})
        );

        let out = normalize_value(CoordinateCheck::run(120.0, 0.0));
        assert_eq!(out["valid"], json!(false));
        assert_eq!(out["reason"], json!("latitude must be between -90 and 90, got 120"));
    }

    #[test]
    fn test_graphql_response_decodes_and_normalizes() {
        let body = json!({
            "data": {"getByAddress": {"addresses": {"data": [{"preciselyID": "P0000GL41OME"}]}}},
            "extensions": {"cost": 12}
        });
        let response: GraphQlResponse = serde_json::from_value(body).unwrap();
        assert!(!response.is_failure());

        let out = normalize_value(response);
        assert_eq!(
            out,
            json!({"data": {"getByAddress": {"addresses": {"data": [{"preciselyID": "P0000GL41OME"}]}}}})
        );
    }

    #[test]
    fn test_graphql_errors_flatten() {
        let body = json!({
            "data": null,
            "errors": [
                {"message": "Field 'fips' is not available", "locations": [{"line": 3, "column": 5}], "path": ["getByAddress", 0]}
            ]
        });
        let response: GraphQlResponse = serde_json::from_value(body).unwrap();
        assert!(response.is_failure());
        assert_eq!(response.error_summary(), "Field 'fips' is not available");

        let out = normalize_value(response);
        assert_eq!(out["data"], Value::Null);
        assert_eq!(out["errors"][0]["locations"], json!([{"line": 3, "column": 5}]));
        assert_eq!(out["errors"][0]["path"], json!(["getByAddress", 0]));
        assert_eq!(out["errors"][0]["extensions"], Value::Null);
    }
}
