use anyhow::Result;
use chrono::Utc;
use contracts::system::notifications::{Notification, NotificationKind, Severity};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use super::rules::Draft;
use crate::shared::data::db::get_connection;

const COLUMNS: &str =
    "id, kind, severity, title, message, entity, entity_id, created_at, read_at";

fn map_row(row: &QueryResult) -> Result<Notification> {
    let kind: String = row.try_get("", "kind")?;
    let severity: String = row.try_get("", "severity")?;
    Ok(Notification {
        id: row.try_get("", "id")?,
        kind: NotificationKind::parse(&kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown notification kind: {}", kind))?,
        severity: Severity::parse(&severity).unwrap_or(Severity::Info),
        title: row.try_get("", "title")?,
        message: row.try_get("", "message")?,
        entity: row.try_get("", "entity")?,
        entity_id: row.try_get("", "entity_id")?,
        created_at: row.try_get("", "created_at")?,
        read_at: row.try_get("", "read_at")?,
    })
}

/// Есть ли непрочитанное уведомление того же вида по тому же объекту
pub async fn unread_exists(kind: NotificationKind, entity_id: &str) -> Result<bool> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT 1 AS found FROM sys_notifications
             WHERE kind = ? AND entity_id = ? AND read_at IS NULL LIMIT 1",
            [kind.as_str().into(), entity_id.to_string().into()],
        ))
        .await?;
    Ok(row.is_some())
}

/// Вставка уведомления. `None`, если непрочитанное того же вида по объекту
/// уже есть (частичный уникальный индекс `ux_notifications_unread`).
pub async fn insert(draft: &Draft) -> Result<Option<String>> {
    let id = uuid::Uuid::new_v4().to_string();
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_notifications
                (id, kind, severity, title, message, entity, entity_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            [
                id.clone().into(),
                draft.kind.as_str().into(),
                draft.severity.as_str().into(),
                draft.title.clone().into(),
                draft.message.clone().into(),
                draft.entity.into(),
                draft.entity_id.clone().into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok((result.rows_affected() > 0).then_some(id))
}

pub async fn list(unread_only: bool) -> Result<Vec<Notification>> {
    let sql = format!(
        "SELECT {} FROM sys_notifications {} ORDER BY created_at DESC LIMIT 500",
        COLUMNS,
        if unread_only { "WHERE read_at IS NULL" } else { "" }
    );
    let rows = get_connection()
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn count_unread() -> Result<i64> {
    let row = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(1) AS cnt FROM sys_notifications WHERE read_at IS NULL".to_string(),
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}

pub async fn mark_read(id: &str) -> Result<bool> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_notifications SET read_at = ? WHERE id = ? AND read_at IS NULL",
            [Utc::now().to_rfc3339().into(), id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_read() -> Result<u64> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_notifications SET read_at = ? WHERE read_at IS NULL",
            [Utc::now().to_rfc3339().into()],
        ))
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(id: &str) -> Result<bool> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_notifications WHERE id = ?",
            [id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
