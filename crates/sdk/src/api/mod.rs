//! API groups exposed by [`LocintelClient`](crate::LocintelClient).

pub mod address_parser;
pub mod data_graph;
pub mod emails;
pub mod emergency_info;
pub mod geo_addressing;
pub mod geo_tax;
pub mod geolocation;
pub mod names;
pub mod phones;
pub mod risks;
pub mod routing;
pub mod streets;
pub mod timezone;

pub use address_parser::AddressParserApi;
pub use data_graph::{DataGraphApi, DataGraphQuery, GraphQlRequest};
pub use emails::EmailsApi;
pub use emergency_info::EmergencyInfoApi;
pub use geo_addressing::{GeoAddressingApi, GeocodeOptions};
pub use geo_tax::GeoTaxApi;
pub use geolocation::GeolocationApi;
pub use names::NamesApi;
pub use phones::PhonesApi;
pub use risks::{CrimeRiskOptions, HistoryFilter, RisksApi};
pub use routing::{RouteOptions, RoutingApi};
pub use streets::{IntersectionOptions, StreetsApi};
pub use timezone::TimezoneApi;

use serde_json::{Map, Value};

/// `{"<key>": value, "preferences": preferences or {}}`
pub(crate) fn keyed_with_preferences(key: &str, value: Value, preferences: Option<Value>) -> Value {
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    body.insert(
        "preferences".to_string(),
        preferences
            .filter(|p| !p.is_null())
            .unwrap_or_else(|| Value::Object(Map::new())),
    );
    Value::Object(body)
}
