use anyhow::Result;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Создать администратора по умолчанию, если пользователей нет
pub async fn ensure_admin_user_exists() -> Result<()> {
    use crate::system::users::{repository, service};

    let count = repository::count_users().await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");
    let admin_id =
        service::create_bootstrap_admin(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD).await?;

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Default admin user created!");
    tracing::warn!("  Username: {}", DEFAULT_ADMIN_USERNAME);
    tracing::warn!("  Password: {}", DEFAULT_ADMIN_PASSWORD);
    tracing::warn!("  User ID: {}", admin_id);
    tracing::warn!("  ⚠️  PLEASE CHANGE THE PASSWORD IMMEDIATELY!");
    tracing::warn!("═══════════════════════════════════════════════");

    Ok(())
}
