use contracts::dashboards::d403_security_overview::SecurityOverviewResponse;

use crate::shared::api_utils::{get_json, query_string};

/// Сводка безопасности за последние `hours` часов (только для администратора)
pub async fn get_security_overview(hours: u32) -> Result<SecurityOverviewResponse, String> {
    get_json(&format!(
        "/api/d403/security{}",
        query_string(&[("hours", hours.to_string())])
    ))
    .await
}
