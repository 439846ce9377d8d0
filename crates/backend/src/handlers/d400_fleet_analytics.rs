use axum::{extract::Query, Json};
use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_fleet_analytics::{FleetAnalyticsRequest, FleetAnalyticsResponse};
use contracts::domain::common::today;
use serde::Deserialize;

use crate::dashboards::d400_fleet_analytics::service;
use crate::shared::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct FleetQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FleetQuery {
    /// По умолчанию: с начала текущего месяца по сегодня
    fn into_request(self, today: NaiveDate) -> FleetAnalyticsRequest {
        let to = self.to.unwrap_or(today);
        let from = self
            .from
            .or_else(|| NaiveDate::from_ymd_opt(to.year(), to.month(), 1))
            .unwrap_or(to);
        FleetAnalyticsRequest {
            date_from: from,
            date_to: to,
        }
    }
}

/// GET /api/d400/fleet?from=2025-01-01&to=2025-03-31
pub async fn get_fleet_analytics(Query(query): Query<FleetQuery>) -> ApiResult<Json<FleetAnalyticsResponse>> {
    let request = query.into_request(today());
    tracing::info!(
        "D400 Dashboard: fleet analytics {} .. {}",
        request.date_from,
        request.date_to
    );

    let response = service::get_fleet_analytics(request).await?;
    tracing::info!("D400 Dashboard: returning {} vehicles", response.vehicles.len());
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_month_to_date() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 17).unwrap();
        let request = FleetQuery { from: None, to: None }.into_request(today);
        assert_eq!(request.date_from, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(request.date_to, today);
    }
}
