use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

const USER_COLUMNS: &str = "id, username, email, full_name, is_active, is_admin, created_at, updated_at, last_login_at, created_by";

fn map_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        is_admin: row.try_get::<i32>("", "is_admin")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
        created_by: row.try_get("", "created_by")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_users (id, username, email, password_hash, full_name, is_active, is_admin, created_at, updated_at, last_login_at, created_by)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                user.id.clone().into(),
                user.username.clone().into(),
                user.email.clone().into(),
                password_hash.to_string().into(),
                user.full_name.clone().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                (if user.is_admin { 1 } else { 0 }).into(),
                user.created_at.clone().into(),
                user.updated_at.clone().into(),
                user.last_login_at.clone().into(),
                user.created_by.clone().into(),
            ],
        ))
        .await
        .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;
    row.as_ref().map(map_row).transpose()
}

/// Поиск по логину без учёта регистра
pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!(
                "SELECT {} FROM sys_users WHERE lower(username) = lower(?)",
                USER_COLUMNS
            ),
            [username.trim().into()],
        ))
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

pub async fn list_all() -> Result<Vec<User>> {
    let rows = get_connection()
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users ORDER BY username", USER_COLUMNS),
        ))
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn update(user: &User) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users
             SET email = ?, full_name = ?, is_active = ?, is_admin = ?, updated_at = ?
             WHERE id = ?",
            [
                user.email.clone().into(),
                user.full_name.clone().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                (if user.is_admin { 1 } else { 0 }).into(),
                user.updated_at.clone().into(),
                user.id.clone().into(),
            ],
        ))
        .await
        .context("Failed to update user")?;

    Ok(())
}

/// Delete user (hard delete). Сессии удаляются каскадом.
pub async fn delete(id: &str) -> Result<bool> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM sys_refresh_tokens WHERE user_id = ?",
        [id.into()],
    ))
    .await?;
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_users WHERE id = ?",
            [id.into()],
        ))
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_last_login(id: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
            [chrono::Utc::now().to_rfc3339().into(), id.into()],
        ))
        .await
        .context("Failed to update last login")?;

    Ok(())
}

pub async fn count_users() -> Result<usize> {
    let row = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS count FROM sys_users".to_string(),
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get::<i64>("", "count")? as usize),
        None => Ok(0),
    }
}

/// Активные администраторы, кроме указанного пользователя
pub async fn count_other_active_admins(except_id: &str) -> Result<usize> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS count FROM sys_users WHERE is_admin = 1 AND is_active = 1 AND id <> ?",
            [except_id.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get::<i64>("", "count")? as usize),
        None => Ok(0),
    }
}

pub async fn update_password(id: &str, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
            [
                password_hash.to_string().into(),
                chrono::Utc::now().to_rfc3339().into(),
                id.into(),
            ],
        ))
        .await
        .context("Failed to update password")?;

    Ok(())
}
