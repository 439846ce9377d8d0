use axum::{extract::Query, Json};
use chrono::Datelike;
use contracts::dashboards::d401_executive_kpi::{ExecutiveKpiRequest, ExecutiveKpiResponse};
use contracts::domain::common::today;
use serde::Deserialize;

use crate::dashboards::d401_executive_kpi::service;
use crate::shared::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct KpiQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/d401/kpi?year=2025&month=5
pub async fn get_executive_kpi(Query(query): Query<KpiQuery>) -> ApiResult<Json<ExecutiveKpiResponse>> {
    let now = today();
    let request = ExecutiveKpiRequest {
        year: query.year.unwrap_or(now.year()),
        month: query.month.unwrap_or(now.month()),
    };
    tracing::info!("D401 Dashboard: KPI for {}-{:02}", request.year, request.month);

    Ok(Json(service::get_executive_kpi(request).await?))
}
