// Argument decoding shared by the tools

use anyhow::{Context, Result};
use locintel_core::validate::parse_coordinate;
use locintel_core::{Coordinates, ValidationError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decode tool arguments; a missing argument object counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).with_context(|| format!("Invalid arguments for {}", tool))
}

/// Unwrap an argument that only some variants of a tool require.
pub fn required<T>(tool: &str, field: &str, value: Option<T>) -> Result<T> {
    value.with_context(|| format!("Invalid arguments for {}: missing field `{}`", tool, field))
}

/// Clients send coordinates both as JSON numbers and as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn number(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            NumberOrString::Number(n) => Ok(*n),
            NumberOrString::Text(s) => parse_coordinate(field, s),
        }
    }

    pub fn coordinate(&self, field: &'static str) -> Result<f64, ValidationError> {
        self.number(field)
    }
}

/// Validated point from separate latitude and longitude arguments.
pub fn point(latitude: &NumberOrString, longitude: &NumberOrString) -> Result<Coordinates, ValidationError> {
    Coordinates::new(latitude.coordinate("latitude")?, longitude.coordinate("longitude")?)
}

/// Axis order of the pairs in a [`PointList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    LatLon,
    LonLat,
}

/// A list of points, either as `"a,b;a,b"` text or as an array of pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PointList {
    Text(String),
    Pairs(Vec<(NumberOrString, NumberOrString)>),
}

impl PointList {
    pub fn coordinates(&self, order: AxisOrder) -> Result<Vec<Coordinates>, ValidationError> {
        let pairs: Vec<(NumberOrString, NumberOrString)> = match self {
            PointList::Pairs(pairs) => pairs.clone(),
            PointList::Text(text) => text
                .split(';')
                .map(str::trim)
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    // A trailing coordinate-system suffix is ignored
                    let mut parts = pair.split(',').map(|p| NumberOrString::Text(p.to_string()));
                    let first = parts.next().unwrap_or(NumberOrString::Text(String::new()));
                    let second = parts.next().unwrap_or(NumberOrString::Text(String::new()));
                    (first, second)
                })
                .collect(),
        };

        pairs
            .iter()
            .map(|(first, second)| match order {
                AxisOrder::LatLon => point(first, second),
                AxisOrder::LonLat => point(second, first),
            })
            .collect()
    }
}

/// Addresses given as a list or as one `;`-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AddressList {
    One(String),
    Many(Vec<String>),
}

impl AddressList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AddressList::One(text) => text.split(';').map(|a| a.trim().to_string()).collect(),
            AddressList::Many(list) => list,
        }
    }
}

/// Parse an optional whitelisted option such as a travel mode.
pub fn option<T>(value: Option<&str>) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>())
        .transpose()
}

/// Check a GeoJSON-ordered `[lon, lat]` pair when it is present and numeric.
pub fn check_lon_lat(value: Option<&Value>) -> Result<(), ValidationError> {
    if let Some(Value::Array(pair)) = value {
        if let [lon, lat] = pair.as_slice() {
            if let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) {
                Coordinates::new(lat, lon)?;
            }
        }
    }
    Ok(())
}

/// Check `{"latitude", "longitude"}` members when both are numeric.
pub fn check_lat_lon_fields(object: &Map<String, Value>) -> Result<(), ValidationError> {
    let lat = object.get("latitude").and_then(Value::as_f64);
    let lon = object.get("longitude").and_then(Value::as_f64);
    if let (Some(lat), Some(lon)) = (lat, lon) {
        Coordinates::new(lat, lon)?;
    }
    Ok(())
}

pub fn require_entries<T>(field: &'static str, entries: &[T]) -> Result<(), ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
