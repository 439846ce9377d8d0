use contracts::system::auth::SessionInfo;

use crate::shared::api_utils::{delete, get_json};

/// Активные сессии: свои, для администратора все
pub async fn fetch_sessions() -> Result<Vec<SessionInfo>, String> {
    get_json("/api/system/sessions").await
}

pub async fn revoke_session(id: &str) -> Result<(), String> {
    delete(&format!("/api/system/sessions/{}", id)).await
}
