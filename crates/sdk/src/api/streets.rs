//! Nearest intersections and posted speed limits.

use crate::api::routing::push_text;
use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::{
    require_non_empty, validate_positive, DriveTimeUnit, HistoricSpeed, RoadClass, SearchRadiusUnit,
};
use locintel_core::{Coordinates, ValidationError};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionOptions {
    pub road_class: Option<RoadClass>,
    pub drive_time: Option<f64>,
    pub drive_time_unit: Option<DriveTimeUnit>,
    /// Vendor default is 50 miles
    pub search_radius: Option<f64>,
    pub search_radius_unit: Option<SearchRadiusUnit>,
    pub historic_speed: Option<HistoricSpeed>,
    pub max_candidates: Option<u32>,
}

impl IntersectionOptions {
    fn query(&self) -> Result<Vec<(&'static str, String)>, ValidationError> {
        let mut query = Vec::new();
        push_text(&mut query, "roadClass", self.road_class.as_ref().map(RoadClass::as_str));
        if let Some(drive_time) = self.drive_time {
            query.push(("driveTime", validate_positive("drive_time", drive_time)?.to_string()));
        }
        push_text(
            &mut query,
            "driveTimeUnit",
            self.drive_time_unit.as_ref().map(DriveTimeUnit::as_str),
        );
        if let Some(radius) = self.search_radius {
            query.push(("searchRadius", validate_positive("search_radius", radius)?.to_string()));
        }
        push_text(
            &mut query,
            "searchRadiusUnit",
            self.search_radius_unit.as_ref().map(SearchRadiusUnit::as_str),
        );
        push_text(
            &mut query,
            "historicSpeed",
            self.historic_speed.as_ref().map(HistoricSpeed::as_str),
        );
        if let Some(max) = self.max_candidates {
            if max == 0 {
                return Err(ValidationError::OutOfRange {
                    field: "max_candidates",
                    min: 1.0,
                    max: f64::from(u32::MAX),
                    value: 0.0,
                });
            }
            query.push(("maxCandidates", max.to_string()));
        }
        Ok(query)
    }
}

/// Streets API.
pub struct StreetsApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> StreetsApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn intersection_by_address(
        &self,
        address: &str,
        options: &IntersectionOptions,
    ) -> LocintelResult<Value> {
        let mut query = vec![("address", require_non_empty("address", address)?.to_string())];
        query.extend(options.query()?);

        self.client
            .http
            .get_query("/streets/v1/intersection/byaddress", &query)
            .await
    }

    pub async fn intersection_by_location(
        &self,
        point: Coordinates,
        options: &IntersectionOptions,
    ) -> LocintelResult<Value> {
        let mut query = vec![
            ("longitude", point.longitude.to_string()),
            ("latitude", point.latitude.to_string()),
        ];
        query.extend(options.query()?);

        self.client
            .http
            .get_query("/streets/v1/intersection/bylocation", &query)
            .await
    }

    /// Speed limit of the road segments nearest to a path of points.
    pub async fn nearest_speed_limit(&self, path: &[Coordinates]) -> LocintelResult<Value> {
        if path.is_empty() {
            return Err(ValidationError::Empty { field: "path" }.into());
        }
        // Longitude first, unlike the routing endpoints
        let path = path
            .iter()
            .map(|p| format!("{},{}", p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .join(";");

        self.client
            .http
            .get_query("/streets/v1/speedlimit", &[("path", path)])
            .await
    }
}
