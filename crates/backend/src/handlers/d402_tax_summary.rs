use axum::{extract::Query, Json};
use chrono::Datelike;
use contracts::dashboards::d402_tax_summary::{TaxSummaryRequest, TaxSummaryResponse};
use contracts::domain::common::today;
use serde::Deserialize;

use crate::dashboards::d402_tax_summary::service;
use crate::shared::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct TaxQuery {
    pub year: Option<i32>,
    pub quarter: Option<u32>,
}

/// GET /api/d402/tax?year=2025&quarter=2
pub async fn get_tax_summary(Query(query): Query<TaxQuery>) -> ApiResult<Json<TaxSummaryResponse>> {
    let request = TaxSummaryRequest {
        year: query.year.unwrap_or_else(|| today().year()),
        quarter: query.quarter,
    };
    tracing::info!("D402 Dashboard: tax summary {} q{:?}", request.year, request.quarter);

    Ok(Json(service::get_tax_summary(request).await?))
}
