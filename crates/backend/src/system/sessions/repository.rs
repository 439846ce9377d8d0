use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::SessionInfo;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

pub struct NewSession<'a> {
    pub user_id: &'a str,
    pub token_hash: String,
    pub expires_at: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

const SESSION_SELECT: &str = "SELECT t.id, t.user_id, COALESCE(u.username, '') AS username,
        t.ip_address, t.user_agent, t.created_at, t.last_used_at, t.expires_at
     FROM sys_refresh_tokens t
     LEFT JOIN sys_users u ON u.id = t.user_id";

fn map_row(row: &QueryResult) -> Result<SessionInfo> {
    Ok(SessionInfo {
        id: row.try_get("", "id")?,
        user_id: row.try_get("", "user_id")?,
        username: row.try_get("", "username")?,
        ip_address: row.try_get("", "ip_address")?,
        user_agent: row.try_get("", "user_agent")?,
        created_at: row.try_get("", "created_at")?,
        last_used_at: row.try_get("", "last_used_at")?,
        expires_at: row.try_get("", "expires_at")?,
    })
}

pub async fn insert(session: NewSession<'_>) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_refresh_tokens
                (id, user_id, token_hash, expires_at, created_at, ip_address, user_agent)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            [
                id.clone().into(),
                session.user_id.to_string().into(),
                session.token_hash.into(),
                session.expires_at.into(),
                Utc::now().to_rfc3339().into(),
                session.ip_address.into(),
                session.user_agent.into(),
            ],
        ))
        .await?;
    Ok(id)
}

/// Действующая сессия по хешу токена: (id сессии, id пользователя)
pub async fn find_active_by_hash(token_hash: &str) -> Result<Option<(String, String)>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [token_hash.to_string().into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;
    match row {
        Some(row) => Ok(Some((row.try_get("", "id")?, row.try_get("", "user_id")?))),
        None => Ok(None),
    }
}

pub async fn touch(id: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET last_used_at = ? WHERE id = ?",
            [Utc::now().to_rfc3339().into(), id.to_string().into()],
        ))
        .await?;
    Ok(())
}

pub async fn revoke_by_hash(token_hash: &str) -> Result<bool> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
            [Utc::now().to_rfc3339().into(), token_hash.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn revoke_by_id(id: &str) -> Result<bool> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
            [Utc::now().to_rfc3339().into(), id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_active(id: &str) -> Result<Option<SessionInfo>> {
    let sql = format!(
        "{} WHERE t.id = ? AND t.revoked_at IS NULL AND t.expires_at > ?",
        SESSION_SELECT
    );
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            [id.to_string().into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;
    row.as_ref().map(map_row).transpose()
}

/// Активные сессии, все или одного пользователя, последние первыми
pub async fn list_active(user_id: Option<&str>) -> Result<Vec<SessionInfo>> {
    let mut sql = format!(
        "{} WHERE t.revoked_at IS NULL AND t.expires_at > ?",
        SESSION_SELECT
    );
    let mut values: Vec<Value> = vec![Utc::now().to_rfc3339().into()];
    if let Some(user_id) = user_id {
        sql.push_str(" AND t.user_id = ?");
        values.push(user_id.to_string().into());
    }
    sql.push_str(" ORDER BY COALESCE(t.last_used_at, t.created_at) DESC");

    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn count_active() -> Result<i64> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(1) AS cnt FROM sys_refresh_tokens WHERE revoked_at IS NULL AND expires_at > ?",
            [Utc::now().to_rfc3339().into()],
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}
