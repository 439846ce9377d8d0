use contracts::dashboards::d400_fleet_analytics::FleetAnalyticsResponse;

use crate::shared::api_utils::{get_json, query_string};

const API_BASE: &str = "/api/d400";

/// Доходность автопарка за период (`yyyy-mm-dd`)
pub async fn get_fleet_analytics(from: &str, to: &str) -> Result<FleetAnalyticsResponse, String> {
    let params = [("from", from.to_string()), ("to", to.to_string())];
    get_json(&format!("{}/fleet{}", API_BASE, query_string(&params))).await
}
