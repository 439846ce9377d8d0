use axum::{
    extract::{Json, Path, Query},
    http::StatusCode,
};
use contracts::system::notifications::{CheckNotificationsResponse, Notification};
use serde::Deserialize;

use crate::shared::error::ApiResult;
use crate::system::notifications::service;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread: bool,
}

/// GET /api/notifications?unread=true
pub async fn list(Query(query): Query<NotificationsQuery>) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(service::list(query.unread).await?))
}

/// POST /api/notifications/check
pub async fn check() -> ApiResult<Json<CheckNotificationsResponse>> {
    Ok(Json(service::check().await?))
}

pub async fn mark_read(Path(id): Path<String>) -> ApiResult<StatusCode> {
    service::mark_read(&id).await?;
    Ok(StatusCode::OK)
}

pub async fn mark_all_read() -> ApiResult<Json<serde_json::Value>> {
    let updated = service::mark_all_read().await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    service::delete(&id).await?;
    Ok(StatusCode::OK)
}
