use contracts::dashboards::d401_executive_kpi::ExecutiveKpiResponse;

use crate::shared::api_utils::{get_json, query_string};

pub async fn get_kpi(year: i32, month: u32) -> Result<ExecutiveKpiResponse, String> {
    let params = [("year", year.to_string()), ("month", month.to_string())];
    get_json(&format!("/api/d401/kpi{}", query_string(&params))).await
}
