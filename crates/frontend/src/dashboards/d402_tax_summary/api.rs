use contracts::dashboards::d402_tax_summary::TaxSummaryResponse;

use crate::shared::api_utils::{get_json, query_string};

/// Налоговая сводка за год или квартал (`quarter = None`: весь год)
pub async fn get_tax_summary(year: i32, quarter: Option<u32>) -> Result<TaxSummaryResponse, String> {
    let mut params = vec![("year", year.to_string())];
    if let Some(q) = quarter {
        params.push(("quarter", q.to_string()));
    }
    get_json(&format!("/api/d402/tax{}", query_string(&params))).await
}
