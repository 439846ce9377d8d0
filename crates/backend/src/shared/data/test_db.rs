//! Временная SQLite для тестов сервисов. Миграции применяются один раз за процесс,
//! тесты работают с базой по очереди.

use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

use super::{db, migration_runner};

static READY: OnceCell<PathBuf> = OnceCell::const_new();
static SERIAL: Mutex<()> = Mutex::const_new(());

/// Подготовить базу и занять её до конца теста
pub async fn acquire() -> MutexGuard<'static, ()> {
    READY
        .get_or_init(|| async {
            let path = std::env::temp_dir().join(format!("rental-test-{}.db", uuid::Uuid::new_v4()));
            migration_runner::run_migrations(&path)
                .await
                .expect("migrations on temp database");
            db::initialize_database(&path)
                .await
                .expect("temp database connection");
            path
        })
        .await;
    SERIAL.lock().await
}
