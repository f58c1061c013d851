// Input validation for tool parameters, applied before any network call

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Largest batch the vendor accepts for address-parse, e-mail and phone batches
pub const MAX_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} is not a valid number: '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} accepts at most {max} entries, got {len}")]
    TooMany {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("invalid {field} '{value}', expected one of: {expected}")]
    NotAllowed {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid email address: '{0}'")]
    Email(String),

    #[error("invalid IP address: '{0}'")]
    IpAddress(String),

    #[error("invalid country code: '{0}'")]
    Country(String),

    #[error("invalid GraphQL request: {0}")]
    GraphQl(String),

    #[error("{field} must be a YYYY-MM-DD date, got '{value}'")]
    Date { field: &'static str, value: String },

    #[error("{field} must be strictly positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

pub fn validate_latitude(value: f64) -> Result<f64, ValidationError> {
    check_range("latitude", value, -90.0, 90.0)
}

pub fn validate_longitude(value: f64) -> Result<f64, ValidationError> {
    check_range("longitude", value, -180.0, 180.0)
}

/// Parse a coordinate given as text (tools accept both numbers and strings).
pub fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed)
}

pub fn validate_batch(field: &'static str, len: usize, max: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::Empty { field });
    }
    if len > max {
        return Err(ValidationError::TooMany { field, max, len });
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<&str, ValidationError> {
    let email = value.trim();
    let invalid = || ValidationError::Email(value.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email),
        _ => Err(invalid()),
    }
}

pub fn validate_ip_address(value: &str) -> Result<IpAddr, ValidationError> {
    value
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| ValidationError::IpAddress(value.to_string()))
}

/// ISO 3166 alpha-2 or alpha-3 code; country names are left to the vendor.
pub fn validate_country(value: &str) -> Result<String, ValidationError> {
    let code = value.trim();
    if (code.len() == 2 || code.len() == 3) && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ValidationError::Country(value.to_string()))
    }
}

/// A GraphQL request body must carry a non-empty `query` and, optionally, an object of `variables`.
pub fn validate_graphql_request(value: &Value) -> Result<(), ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::GraphQl("expected an object".to_string()))?;

    match object.get("query") {
        Some(Value::String(query)) if !query.trim().is_empty() => {}
        Some(Value::String(_)) => {
            return Err(ValidationError::GraphQl("'query' must not be empty".to_string()))
        }
        Some(_) => return Err(ValidationError::GraphQl("'query' must be a string".to_string())),
        None => return Err(ValidationError::GraphQl("missing 'query'".to_string())),
    }

    match object.get("variables") {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(ValidationError::GraphQl("'variables' must be an object".to_string())),
    }
}

pub fn validate_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::Date {
        field,
        value: value.to_string(),
    })
}

pub fn validate_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

fn not_allowed(field: &'static str, value: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field,
        value: value.to_string(),
        expected: allowed.join(", "),
    }
}

/// Leniency used when matching input addresses against reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchMode {
    Exact,
    Standard,
    Relaxed,
    Custom,
    Interactive,
}

impl MatchMode {
    pub const ALLOWED: [&'static str; 5] = ["EXACT", "STANDARD", "RELAXED", "CUSTOM", "INTERACTIVE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "EXACT",
            MatchMode::Standard => "STANDARD",
            MatchMode::Relaxed => "RELAXED",
            MatchMode::Custom => "CUSTOM",
            MatchMode::Interactive => "INTERACTIVE",
        }
    }
}

impl FromStr for MatchMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(MatchMode::Exact),
            "STANDARD" => Ok(MatchMode::Standard),
            "RELAXED" => Ok(MatchMode::Relaxed),
            "CUSTOM" => Ok(MatchMode::Custom),
            "INTERACTIVE" => Ok(MatchMode::Interactive),
            _ => Err(not_allowed("match_mode", s, &Self::ALLOWED)),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a data-graph lookup identifies its subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
    PreciselyId,
    Address,
    Location,
}

impl QueryType {
    pub const ALLOWED: [&'static str; 3] = ["PRECISELY_ID", "ADDRESS", "LOCATION"];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::PreciselyId => "PRECISELY_ID",
            QueryType::Address => "ADDRESS",
            QueryType::Location => "LOCATION",
        }
    }
}

impl FromStr for QueryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRECISELY_ID" => Ok(QueryType::PreciselyId),
            "ADDRESS" => Ok(QueryType::Address),
            "LOCATION" => Ok(QueryType::Location),
            _ => Err(not_allowed("queryType", s, &Self::ALLOWED)),
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of vendor option values, matched case-insensitively and sent in
/// the vendor's own spelling.
macro_rules! whitelist {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(not_allowed($field, s, Self::ALLOWED))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

whitelist!(
    /// Routing database, i.e. the mode of travel
    TravelMode, "db", {
        Driving => "driving",
        Walking => "walking",
        Bicycling => "bicycling",
        Transit => "transit",
    }
);

whitelist!(
    /// What a route or cost matrix minimizes
    OptimizeBy, "optimize_by", {
        Time => "time",
        Distance => "distance",
    }
);

whitelist!(
    RoadClass, "road_class", {
        Major => "Major",
        Secondary => "Secondary",
        Other => "Other",
        All => "All",
    }
);

whitelist!(
    DriveTimeUnit, "drive_time_unit", {
        Hours => "hours",
        Minutes => "minutes",
        Seconds => "seconds",
        Milliseconds => "milliseconds",
    }
);

whitelist!(
    SearchRadiusUnit, "search_radius_unit", {
        Feet => "feet",
        Meter => "meter",
        Kilometers => "kilometers",
        Miles => "miles",
    }
);

whitelist!(
    /// Traffic period used for intersection drive times
    HistoricSpeed, "historic_speed", {
        AmPeak => "AMPEAK",
        PmPeak => "PMPEAK",
        OffPeak => "OFFPEAK",
        Night => "NIGHT",
    }
);

whitelist!(
    /// Crime risk category
    RiskType, "risk_type", {
        All => "all",
        General => "general",
        Personal => "personal",
        Property => "property",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_ranges() {
        assert_eq!(validate_latitude(42.36).unwrap(), 42.36);
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());

        assert!(matches!(
            validate_latitude(90.5),
            Err(ValidationError::OutOfRange { field: "latitude", .. })
        ));
        assert!(matches!(
            validate_longitude(181.0),
            Err(ValidationError::OutOfRange { field: "longitude", .. })
        ));
        assert_eq!(
            validate_latitude(f64::NAN),
            Err(ValidationError::NotFinite { field: "latitude" })
        );
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("latitude", " 39.55 ").unwrap(), 39.55);
        assert!(matches!(
            parse_coordinate("latitude", "north"),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_batch_limits() {
        assert!(validate_batch("emails", 1, MAX_BATCH_SIZE).is_ok());
        assert!(validate_batch("emails", 10, MAX_BATCH_SIZE).is_ok());
        assert_eq!(
            validate_batch("emails", 11, MAX_BATCH_SIZE),
            Err(ValidationError::TooMany {
                field: "emails",
                max: 10,
                len: 11
            })
        );
        assert_eq!(
            validate_batch("emails", 0, MAX_BATCH_SIZE),
            Err(ValidationError::Empty { field: "emails" })
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(validate_email(" john.doe@company.com ").unwrap(), "john.doe@company.com");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@company.com").is_err());
        assert!(validate_email("john@localhost").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("john doe@company.com").is_err());
    }

    #[test]
    fn test_ip_address() {
        assert!(validate_ip_address("8.8.8.8").is_ok());
        assert!(validate_ip_address("2001:4860:4860::8888").is_ok());
        assert!(validate_ip_address("999.1.1.1").is_err());
    }

    #[test]
    fn test_country() {
        assert_eq!(validate_country("usa").unwrap(), "USA");
        assert_eq!(validate_country("US").unwrap(), "US");
        assert!(validate_country("United States").is_err());
        assert!(validate_country("U1").is_err());
    }

    #[test]
    fn test_whitelists_case_insensitive() {
        assert_eq!("relaxed".parse::<MatchMode>().unwrap(), MatchMode::Relaxed);
        assert_eq!("precisely_id".parse::<QueryType>().unwrap(), QueryType::PreciselyId);
        assert_eq!(MatchMode::Interactive.to_string(), "INTERACTIVE");
    }

    #[test]
    fn test_whitelist_rejection_lists_options() {
        let err = "fuzzy".parse::<MatchMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid match_mode 'fuzzy', expected one of: EXACT, STANDARD, RELAXED, CUSTOM, INTERACTIVE"
        );
    }

    #[test]
    fn test_routing_and_street_whitelists() {
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walking);
        assert_eq!(" DISTANCE ".parse::<OptimizeBy>().unwrap().as_str(), "distance");
        assert_eq!("major".parse::<RoadClass>().unwrap().as_str(), "Major");
        assert_eq!("ampeak".parse::<HistoricSpeed>().unwrap().to_string(), "AMPEAK");
        assert_eq!("Miles".parse::<SearchRadiusUnit>().unwrap(), SearchRadiusUnit::Miles);
        assert_eq!("property".parse::<RiskType>().unwrap(), RiskType::Property);

        let err = "flying".parse::<TravelMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid db 'flying', expected one of: driving, walking, bicycling, transit"
        );
        assert!("fastest".parse::<OptimizeBy>().is_err());
        assert!("weeks".parse::<DriveTimeUnit>().is_err());
    }

    #[test]
    fn test_date_and_positive() {
        assert_eq!(
            validate_date("start_date", "2020-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()
        );
        assert!(validate_date("start_date", "2020-02-30").is_err());
        assert!(validate_date("end_date", "01/31/2020").is_err());

        assert_eq!(validate_positive("radius", 5.0).unwrap(), 5.0);
        assert!(matches!(
            validate_positive("radius", 0.0),
            Err(ValidationError::NotPositive { field: "radius", .. })
        ));
    }

    #[test]
    fn test_graphql_request() {
        assert!(validate_graphql_request(&json!({"query": "{ a }"})).is_ok());
        assert!(validate_graphql_request(&json!({"query": "{ a }", "variables": {"x": 1}})).is_ok());
        assert!(validate_graphql_request(&json!({"query": "  "})).is_err());
        assert!(validate_graphql_request(&json!({"variables": {}})).is_err());
        assert!(validate_graphql_request(&json!({"query": "{ a }", "variables": [1]})).is_err());
        assert!(validate_graphql_request(&json!("query")).is_err());
    }
}
