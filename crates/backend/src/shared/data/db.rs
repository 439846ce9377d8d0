use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;

use super::migration_runner::build_sqlite_url;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Открывает файл SQLite (создаёт при необходимости) и сохраняет соединение.
///
/// Схема к этому моменту уже применена `migration_runner::run_migrations`.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(db_path);
    tracing::info!("Connecting to database: {}", db_url);

    let conn = Database::connect(&db_url).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
