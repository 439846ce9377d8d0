use anyhow::{Context, Result};
use contracts::system::audit::{AuditAction, AuditEntry, AuditQuery};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

const AUDIT_COLUMNS: &str =
    "id, timestamp, user_id, username, action, entity, entity_id, details, ip_address";

pub struct NewAuditEntry<'a> {
    pub user_id: Option<&'a str>,
    pub username: Option<&'a str>,
    pub action: AuditAction,
    pub entity: &'a str,
    pub entity_id: Option<&'a str>,
    pub details: Option<String>,
    pub ip_address: Option<&'a str>,
}

fn map_row(row: &QueryResult) -> Result<AuditEntry> {
    let action: String = row.try_get("", "action")?;
    Ok(AuditEntry {
        id: row.try_get("", "id")?,
        timestamp: row.try_get("", "timestamp")?,
        user_id: row.try_get("", "user_id")?,
        username: row.try_get("", "username")?,
        action: AuditAction::parse(&action)
            .ok_or_else(|| anyhow::anyhow!("Unknown audit action in log: {}", action))?,
        entity: row.try_get("", "entity")?,
        entity_id: row.try_get("", "entity_id")?,
        details: row.try_get("", "details")?,
        ip_address: row.try_get("", "ip_address")?,
    })
}

pub async fn insert(entry: NewAuditEntry<'_>) -> Result<()> {
    let owned = |v: Option<&str>| v.map(str::to_string);
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_audit_log (timestamp, user_id, username, action, entity, entity_id, details, ip_address)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            [
                chrono::Utc::now().to_rfc3339().into(),
                owned(entry.user_id).into(),
                owned(entry.username).into(),
                entry.action.as_str().into(),
                entry.entity.into(),
                owned(entry.entity_id).into(),
                entry.details.into(),
                owned(entry.ip_address).into(),
            ],
        ))
        .await
        .context("Failed to write audit entry")?;
    Ok(())
}

/// Журнал с фильтрами, новые записи первыми
pub async fn list(query: &AuditQuery) -> Result<Vec<AuditEntry>> {
    let mut sql = format!("SELECT {} FROM sys_audit_log WHERE 1 = 1", AUDIT_COLUMNS);
    let mut values: Vec<Value> = Vec::new();

    if let Some(entity) = query.entity.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(" AND entity = ?");
        values.push(entity.into());
    }
    if let Some(user) = query.user.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(" AND (username = ? OR user_id = ?)");
        values.push(user.into());
        values.push(user.into());
    }
    if let Some(action) = query.action.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(" AND action = ?");
        values.push(action.into());
    }
    sql.push_str(" ORDER BY id DESC LIMIT ? OFFSET ?");
    values.push((query.limit.unwrap_or(200).min(1000) as i64).into());
    values.push((query.offset.unwrap_or(0) as i64).into());

    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .await?;
    rows.iter().map(map_row).collect()
}

/// События с указанными действиями после момента `since`
pub async fn list_actions_since(
    actions: &[AuditAction],
    since: &str,
    limit: u64,
) -> Result<Vec<AuditEntry>> {
    if actions.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; actions.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM sys_audit_log WHERE timestamp >= ? AND action IN ({}) ORDER BY id DESC LIMIT ?",
        AUDIT_COLUMNS, placeholders
    );
    let mut values: Vec<Value> = vec![since.into()];
    values.extend(actions.iter().map(|a| Value::from(a.as_str())));
    values.push((limit as i64).into());

    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .await?;
    rows.iter().map(map_row).collect()
}
