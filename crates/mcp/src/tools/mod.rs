pub mod addressing;
pub mod args;
pub mod data_graph;
pub mod emergency;
pub mod envelope;
pub mod geo_tax;
pub mod geolocation;
pub mod identity;
pub mod local;
mod registry;
pub mod risks;
pub mod routing;
pub mod streets;
pub mod timezone;

pub use registry::{
    json_schema_any_object, json_schema_array, json_schema_enum, json_schema_integer,
    json_schema_number, json_schema_object, json_schema_string, json_schema_string_default, Tool,
    ToolCategory, ToolRegistry,
};

use addressing::{
    AddressLineKind, AddressLineTool, AutocompleteKind, AutocompleteTool, LookupTool,
    ParseAddressBatchTool, ParseAddressTool, ReverseGeocodeTool,
};
use data_graph::{CustomGraphQlTool, CustomQueryKind, DataGraphTool};
use emergency::{PsapFccIdTool, PsapKind, PsapTool};
use geo_tax::{TaxLookupKind, TaxLookupTool};
use geolocation::{IpGeolocationTool, WifiGeolocationTool};
use identity::{DataObjectKind, DataObjectTool, VerifyBatchEmailsTool, VerifyEmailTool};
use local::ValidateCoordinatesTool;
use locintel_sdk::{DataGraphQuery, LocintelClient};
use risks::{CrimeRiskKind, CrimeRiskTool, HazardHistoryTool, HazardKind};
use routing::{RouteKind, RouteTool};
use std::sync::Arc;
use streets::{IntersectionKind, IntersectionTool, SpeedLimitTool};
use timezone::{TimezoneKind, TimezoneTool};

/// Register every vendor tool plus the local checks.
pub fn build_registry(client: &LocintelClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Addressing
    registry.register(Arc::new(AddressLineTool::new(client.clone(), AddressLineKind::Geocode)));
    registry.register(Arc::new(ReverseGeocodeTool::new(client.clone())));
    registry.register(Arc::new(AddressLineTool::new(client.clone(), AddressLineKind::Verify)));
    for kind in [
        AutocompleteKind::Standard,
        AutocompleteKind::PostalCity,
        AutocompleteKind::Express,
    ] {
        registry.register(Arc::new(AutocompleteTool::new(client.clone(), kind)));
    }
    registry.register(Arc::new(LookupTool::new(client.clone())));
    registry.register(Arc::new(ParseAddressTool::new(client.clone())));
    registry.register(Arc::new(ParseAddressBatchTool::new(client.clone())));

    // Data graph
    for query in DataGraphQuery::ALL {
        registry.register(Arc::new(DataGraphTool::new(client.clone(), query)));
    }
    for kind in CustomQueryKind::ALL {
        registry.register(Arc::new(CustomGraphQlTool::new(client.clone(), kind)));
    }

    for kind in TaxLookupKind::ALL {
        registry.register(Arc::new(TaxLookupTool::new(client.clone(), kind)));
    }

    // Emergency
    for kind in PsapKind::ALL {
        registry.register(Arc::new(PsapTool::new(client.clone(), kind)));
    }
    registry.register(Arc::new(PsapFccIdTool::new(client.clone())));

    registry.register(Arc::new(IpGeolocationTool::new(client.clone())));
    registry.register(Arc::new(WifiGeolocationTool::new(client.clone())));

    // Identity
    registry.register(Arc::new(VerifyEmailTool::new(client.clone())));
    registry.register(Arc::new(VerifyBatchEmailsTool::new(client.clone())));
    for kind in DataObjectKind::ALL {
        registry.register(Arc::new(DataObjectTool::new(client.clone(), kind)));
    }

    // Routing, streets and location risk
    for kind in RouteKind::ALL {
        registry.register(Arc::new(RouteTool::new(client.clone(), kind)));
    }
    for kind in IntersectionKind::ALL {
        registry.register(Arc::new(IntersectionTool::new(client.clone(), kind)));
    }
    registry.register(Arc::new(SpeedLimitTool::new(client.clone())));
    for kind in CrimeRiskKind::ALL {
        registry.register(Arc::new(CrimeRiskTool::new(client.clone(), kind)));
    }
    for kind in HazardKind::ALL {
        registry.register(Arc::new(HazardHistoryTool::new(client.clone(), kind)));
    }

    registry.register(Arc::new(TimezoneTool::new(client.clone(), TimezoneKind::Addresses)));
    registry.register(Arc::new(TimezoneTool::new(client.clone(), TimezoneKind::Locations)));

    registry.register(Arc::new(ValidateCoordinatesTool));

    registry
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::protocol::CallToolResult;
    use locintel_core::Envelope;
    use locintel_sdk::{Credentials, LocintelClient, RetryConfig};
    use wiremock::MockServer;

    pub(crate) fn test_client(server: &MockServer) -> LocintelClient {
        LocintelClient::builder()
            .base_url(server.uri())
            .credentials(Credentials::bearer("test-token"))
            .retry_config(RetryConfig::no_retry())
            .build()
            .unwrap()
    }

    pub(crate) fn envelope_of(result: &CallToolResult) -> Envelope {
        serde_json::from_str(&result.text()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> LocintelClient {
        LocintelClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_has_every_tool() {
        let registry = build_registry(&offline_client());
        assert_eq!(registry.len(), 61);

        for name in [
            "geocode",
            "autocomplete_v2",
            "get_property_data",
            "get_parcels_by_address",
            "get_places_by_address",
            "lookup_by_locations",
            "psap_ahj_fccid",
            "geo_locate_wifi_access_point",
            "validate_batch_phones",
            "timezone_locations",
            "get_route_by_location",
            "get_travel_cost_matrix_by_address",
            "get_nearest_speed_limit",
            "get_fire_history",
            "validate_coordinates",
        ] {
            assert!(registry.contains(name), "missing tool {}", name);
        }
    }

    #[test]
    fn test_category_counts() {
        let counts = build_registry(&offline_client()).category_counts();
        assert_eq!(counts[&ToolCategory::Addressing], 9);
        assert_eq!(counts[&ToolCategory::DataGraph], 22);
        assert_eq!(counts[&ToolCategory::GeoTax], 4);
        assert_eq!(counts[&ToolCategory::Emergency], 5);
        assert_eq!(counts[&ToolCategory::Geolocation], 2);
        assert_eq!(counts[&ToolCategory::Identity], 5);
        assert_eq!(counts[&ToolCategory::Timezone], 2);
        assert_eq!(counts[&ToolCategory::Routing], 4);
        assert_eq!(counts[&ToolCategory::Streets], 3);
        assert_eq!(counts[&ToolCategory::Risk], 4);
        assert_eq!(counts[&ToolCategory::Local], 1);
    }

    #[test]
    fn test_schemas_declare_required_fields() {
        let registry = build_registry(&offline_client());
        for schema in registry.list_schemas() {
            assert_eq!(schema.input_schema["type"], "object", "{}", schema.name);
            assert!(!schema.description.is_empty(), "{}", schema.name);
        }
    }
}
