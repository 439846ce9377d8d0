use contracts::system::audit::{AuditEntry, AuditQuery};

use crate::shared::api_utils::{get_json, query_string};

/// Путь запроса журнала; пустые фильтры не передаются
pub fn audit_path(query: &AuditQuery) -> String {
    let params = [
        ("entity", query.entity.clone().unwrap_or_default()),
        ("user", query.user.clone().unwrap_or_default()),
        ("action", query.action.clone().unwrap_or_default()),
        ("limit", query.limit.map(|v| v.to_string()).unwrap_or_default()),
        ("offset", query.offset.map(|v| v.to_string()).unwrap_or_default()),
    ];
    format!("/api/system/audit{}", query_string(&params))
}

pub async fn fetch_audit(query: &AuditQuery) -> Result<Vec<AuditEntry>, String> {
    get_json(&audit_path(query)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_skips_empty_filters() {
        assert_eq!(audit_path(&AuditQuery::default()), "/api/system/audit");
        let query = AuditQuery {
            entity: Some("vehicle".into()),
            action: Some("".into()),
            limit: Some(50),
            offset: Some(100),
            ..Default::default()
        };
        assert_eq!(
            audit_path(&query),
            "/api/system/audit?entity=vehicle&limit=50&offset=100"
        );
    }
}
