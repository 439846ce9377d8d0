use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerEntryDto, LedgerSummary};

use crate::shared::api_utils::{delete, get_json, post_json, query_string, IdResponse};

/// Пустой `kind` означает доходы и расходы вместе
pub fn list_path(kind: &str, from: &str, to: &str) -> String {
    let params = [
        ("kind", kind.to_string()),
        ("from", from.to_string()),
        ("to", to.to_string()),
    ];
    format!("/api/ledger_entry{}", query_string(&params))
}

pub async fn fetch_entries(kind: &str, from: &str, to: &str) -> Result<Vec<LedgerEntry>, String> {
    get_json(&list_path(kind, from, to)).await
}

pub async fn fetch_summary(from: &str, to: &str) -> Result<LedgerSummary, String> {
    let params = [("from", from.to_string()), ("to", to.to_string())];
    get_json(&format!("/api/ledger_entry/summary{}", query_string(&params))).await
}

pub async fn fetch_entry(id: &str) -> Result<LedgerEntry, String> {
    get_json(&format!("/api/ledger_entry/{}", id)).await
}

pub async fn save_entry(dto: &LedgerEntryDto) -> Result<String, String> {
    let saved: IdResponse = post_json("/api/ledger_entry", dto).await?;
    Ok(saved.id)
}

pub async fn delete_entry(id: &str) -> Result<(), String> {
    delete(&format!("/api/ledger_entry/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_skips_blank_filters() {
        assert_eq!(list_path("", "", ""), "/api/ledger_entry");
        assert_eq!(
            list_path("Expense", "2026-01-01", "2026-03-31"),
            "/api/ledger_entry?kind=Expense&from=2026-01-01&to=2026-03-31"
        );
    }
}
