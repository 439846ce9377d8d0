use contracts::system::notifications::{CheckNotificationsResponse, Notification};

use crate::shared::api_utils::{delete, get_json, post_empty, post_json};

pub async fn fetch_notifications(unread_only: bool) -> Result<Vec<Notification>, String> {
    let path = if unread_only {
        "/api/notifications?unread=true"
    } else {
        "/api/notifications"
    };
    get_json(path).await
}

/// Запустить проверку сроков сейчас, не дожидаясь планировщика
pub async fn check_now() -> Result<CheckNotificationsResponse, String> {
    post_json("/api/notifications/check", &serde_json::json!({})).await
}

pub async fn mark_read(id: &str) -> Result<(), String> {
    post_empty(&format!("/api/notifications/{}/read", id)).await
}

pub async fn mark_all_read() -> Result<(), String> {
    post_empty("/api/notifications/read-all").await
}

pub async fn delete_notification(id: &str) -> Result<(), String> {
    delete(&format!("/api/notifications/{}", id)).await
}
