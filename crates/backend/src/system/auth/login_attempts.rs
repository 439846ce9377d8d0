//! Журнал попыток входа и блокировка после серии неудач

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use contracts::system::auth::LoginAttempt;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::config;
use crate::shared::data::db::get_connection;

pub async fn record(username: &str, ip_address: Option<&str>, success: bool) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_login_attempts (username, ip_address, success, attempted_at)
             VALUES (?, ?, ?, ?)",
            [
                username.to_lowercase().into(),
                ip_address.map(str::to_string).into(),
                (if success { 1 } else { 0 }).into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}

/// Неудачные попытки после `since`, не перекрытые последующим успешным входом
pub async fn recent_failures(username: &str, since: DateTime<Utc>) -> Result<i64> {
    let username = username.to_lowercase();
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(1) AS cnt FROM sys_login_attempts
             WHERE username = ? AND success = 0 AND attempted_at >= ?
               AND attempted_at > COALESCE(
                   (SELECT MAX(attempted_at) FROM sys_login_attempts WHERE username = ? AND success = 1),
                   '')",
            [
                username.clone().into(),
                since.to_rfc3339().into(),
                username.into(),
            ],
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}

/// Проверка блокировки по настройкам `[auth]`
pub async fn is_locked_out(username: &str) -> Result<bool> {
    let auth = &config::get().auth;
    let since = Utc::now() - Duration::minutes(auth.lockout_minutes);
    let failures = recent_failures(username, since).await?;
    Ok(failures >= auth.max_failed_logins)
}

/// Все попытки после `since`, новые первыми
pub async fn list_since(since: DateTime<Utc>) -> Result<Vec<LoginAttempt>> {
    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT username, ip_address, success, attempted_at FROM sys_login_attempts
             WHERE attempted_at >= ? ORDER BY attempted_at DESC",
            [since.to_rfc3339().into()],
        ))
        .await?;

    rows.into_iter()
        .map(|row| {
            Ok(LoginAttempt {
                username: row.try_get("", "username")?,
                ip_address: row.try_get("", "ip_address")?,
                success: row.try_get::<i32>("", "success")? != 0,
                attempted_at: row.try_get("", "attempted_at")?,
            })
        })
        .collect()
}
