use axum::{extract::Query, Json};
use contracts::dashboards::d403_security_overview::{SecurityOverviewRequest, SecurityOverviewResponse};
use serde::Deserialize;

use crate::dashboards::d403_security_overview::service;
use crate::shared::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct SecurityQuery {
    #[serde(default = "default_hours")]
    pub hours: u32,
}

fn default_hours() -> u32 {
    24
}

/// GET /api/d403/security?hours=24 (admin)
pub async fn get_security_overview(
    Query(query): Query<SecurityQuery>,
) -> ApiResult<Json<SecurityOverviewResponse>> {
    let response = service::get_security_overview(SecurityOverviewRequest { hours: query.hours }).await?;
    tracing::info!(
        "D403 Dashboard: {} failed logins, {} locked accounts",
        response.failed_logins,
        response.locked_accounts.len()
    );
    Ok(Json(response))
}
