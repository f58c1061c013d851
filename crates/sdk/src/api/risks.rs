//! Location-based crime risk and hazard history.

use crate::client::LocintelClient;
use crate::error::{LocintelError, LocintelResult};
use locintel_core::validate::{require_non_empty, validate_date, validate_positive, RiskType};
use locintel_core::Coordinates;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeRiskOptions {
    pub risk_type: Option<RiskType>,
    pub include_geometry: bool,
}

impl CrimeRiskOptions {
    fn extend(&self, query: &mut Vec<(&'static str, String)>) {
        if let Some(risk_type) = self.risk_type {
            query.push(("type", risk_type.as_str().to_string()));
        }
        let flag = if self.include_geometry { "Y" } else { "N" };
        query.push(("includeGeometry", flag.to_string()));
    }
}

/// Filters for earthquake and fire history. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Search radius in miles
    pub radius: Option<f64>,
    /// Earthquake history only
    pub minimal_magnitude: Option<f64>,
}

impl HistoryFilter {
    fn query(&self, point: &Coordinates) -> LocintelResult<Vec<(&'static str, String)>> {
        let mut query = vec![
            ("longitude", point.longitude.to_string()),
            ("latitude", point.latitude.to_string()),
        ];

        let start = self
            .start_date
            .as_deref()
            .map(|d| validate_date("start_date", d))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|d| validate_date("end_date", d))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(LocintelError::InvalidInput(format!(
                    "end_date {} is before start_date {}",
                    end, start
                )));
            }
        }
        if let Some(start) = start {
            query.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            query.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }

        if let Some(radius) = self.radius {
            query.push(("radius", validate_positive("radius", radius)?.to_string()));
        }
        if let Some(magnitude) = self.minimal_magnitude {
            query.push((
                "minimalMagnitude",
                validate_positive("minimal_magnitude", magnitude)?.to_string(),
            ));
        }
        Ok(query)
    }
}

/// Risks API.
pub struct RisksApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> RisksApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn crime_by_address(
        &self,
        address: &str,
        options: &CrimeRiskOptions,
    ) -> LocintelResult<Value> {
        let mut query = vec![("address", require_non_empty("address", address)?.to_string())];
        options.extend(&mut query);

        self.client
            .http
            .get_query("/risks/v1/crime/byaddress", &query)
            .await
    }

    pub async fn crime_by_location(
        &self,
        point: Coordinates,
        options: &CrimeRiskOptions,
    ) -> LocintelResult<Value> {
        let mut query = vec![
            ("longitude", point.longitude.to_string()),
            ("latitude", point.latitude.to_string()),
        ];
        options.extend(&mut query);

        self.client
            .http
            .get_query("/risks/v1/crime/bylocation", &query)
            .await
    }

    pub async fn earthquake_history(
        &self,
        point: Coordinates,
        filter: &HistoryFilter,
    ) -> LocintelResult<Value> {
        let query = filter.query(&point)?;
        self.client
            .http
            .get_query("/risks/v1/earthquakehistory", &query)
            .await
    }

    /// `filter.minimal_magnitude` is ignored.
    pub async fn fire_history(
        &self,
        point: Coordinates,
        filter: &HistoryFilter,
    ) -> LocintelResult<Value> {
        let filter = HistoryFilter {
            minimal_magnitude: None,
            ..filter.clone()
        };
        let query = filter.query(&point)?;
        self.client
            .http
            .get_query("/risks/v1/firehistory", &query)
            .await
    }
}
