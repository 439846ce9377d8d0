use axum::extract::{Json, Query};
use contracts::system::audit::{AuditEntry, AuditQuery};

use crate::shared::error::ApiResult;
use crate::system::audit::service;

/// Журнал аудита с фильтрами `entity`, `user`, `action` (admin only)
pub async fn list(Query(query): Query<AuditQuery>) -> ApiResult<Json<Vec<AuditEntry>>> {
    Ok(Json(service::list(&query).await?))
}
