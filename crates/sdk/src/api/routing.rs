//! Point-to-point routes and travel cost matrices.

use crate::client::LocintelClient;
use crate::error::LocintelResult;
use locintel_core::validate::{require_non_empty, validate_country, OptimizeBy, TravelMode};
use locintel_core::{Coordinates, ValidationError};
use serde_json::Value;

/// Optional knobs shared by route and matrix requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptions {
    pub db: Option<TravelMode>,
    pub optimize_by: Option<OptimizeBy>,
    pub return_distance: Option<bool>,
    pub distance_unit: Option<String>,
    pub return_time: Option<bool>,
    pub time_unit: Option<String>,
    pub major_roads: Option<bool>,
    /// Matrix requests only
    pub return_optimal_routes_only: Option<bool>,
}

type Query = Vec<(&'static str, String)>;

impl RouteOptions {
    fn extend(&self, query: &mut Query) {
        if let Some(db) = self.db {
            query.push(("db", db.as_str().to_string()));
        }
        if let Some(optimize_by) = self.optimize_by {
            query.push(("optimizeBy", optimize_by.as_str().to_string()));
        }
        push_flag(query, "returnDistance", self.return_distance);
        push_text(query, "distanceUnit", self.distance_unit.as_deref());
        push_flag(query, "returnTime", self.return_time);
        push_text(query, "timeUnit", self.time_unit.as_deref());
        push_flag(query, "majorRoads", self.major_roads);
        push_flag(query, "returnOptimalRoutesOnly", self.return_optimal_routes_only);
    }
}

pub(crate) fn push_flag(query: &mut Query, key: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

pub(crate) fn push_text(query: &mut Query, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

/// `lat,lon`, the point format of the routing endpoints
fn point(coordinates: &Coordinates) -> String {
    format!("{},{}", coordinates.latitude, coordinates.longitude)
}

fn points(field: &'static str, coordinates: &[Coordinates]) -> Result<String, ValidationError> {
    if coordinates.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(coordinates.iter().map(point).collect::<Vec<_>>().join(";"))
}

fn addresses(field: &'static str, addresses: &[String]) -> Result<String, ValidationError> {
    let cleaned = addresses
        .iter()
        .map(|a| require_non_empty(field, a))
        .collect::<Result<Vec<_>, _>>()?;
    if cleaned.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(cleaned.join(";"))
}

fn country(query: &mut Query, country: Option<&str>) -> Result<(), ValidationError> {
    if let Some(code) = country.map(str::trim).filter(|c| !c.is_empty()) {
        query.push(("country", validate_country(code)?));
    }
    Ok(())
}

/// Routing API.
pub struct RoutingApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> RoutingApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn route_by_address(
        &self,
        start: &str,
        end: &str,
        intermediate: &[String],
        country_code: Option<&str>,
        options: &RouteOptions,
    ) -> LocintelResult<Value> {
        let mut query: Query = vec![
            ("startAddress", require_non_empty("start_address", start)?.to_string()),
            ("endAddress", require_non_empty("end_address", end)?.to_string()),
        ];
        if !intermediate.is_empty() {
            query.push((
                "intermediateAddresses",
                addresses("intermediate_addresses", intermediate)?,
            ));
        }
        country(&mut query, country_code)?;
        options.extend(&mut query);

        self.client
            .http
            .get_query("/routing/v1/route/byAddress", &query)
            .await
    }

    pub async fn route_by_location(
        &self,
        start: Coordinates,
        end: Coordinates,
        intermediate: &[Coordinates],
        options: &RouteOptions,
    ) -> LocintelResult<Value> {
        let mut query: Query = vec![("startPoint", point(&start)), ("endPoint", point(&end))];
        if !intermediate.is_empty() {
            query.push(("intermediatePoints", points("intermediate_points", intermediate)?));
        }
        options.extend(&mut query);

        self.client
            .http
            .get_query("/routing/v1/route/byLocation", &query)
            .await
    }

    pub async fn travel_cost_matrix_by_address(
        &self,
        starts: &[String],
        ends: &[String],
        country_code: Option<&str>,
        options: &RouteOptions,
    ) -> LocintelResult<Value> {
        let mut query: Query = vec![
            ("startAddresses", addresses("start_addresses", starts)?),
            ("endAddresses", addresses("end_addresses", ends)?),
        ];
        country(&mut query, country_code)?;
        options.extend(&mut query);

        self.client
            .http
            .get_query("/routing/v1/travelcostmatrix/byAddress", &query)
            .await
    }

    pub async fn travel_cost_matrix_by_location(
        &self,
        starts: &[Coordinates],
        ends: &[Coordinates],
        options: &RouteOptions,
    ) -> LocintelResult<Value> {
        let mut query: Query = vec![
            ("startPoints", points("start_points", starts)?),
            ("endPoints", points("end_points", ends)?),
        ];
        options.extend(&mut query);

        self.client
            .http
            .get_query("/routing/v1/travelcostmatrix/byLocation", &query)
            .await
    }
}
