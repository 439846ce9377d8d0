use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::auth::SessionInfo;

use crate::shared::error::ApiResult;
use crate::system::auth::extractor::Actor;
use crate::system::sessions::service;

pub async fn list(actor: Actor) -> ApiResult<Json<Vec<SessionInfo>>> {
    Ok(Json(service::list_for(&actor).await?))
}

pub async fn revoke(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    service::revoke(&id, &actor).await?;
    Ok(StatusCode::OK)
}
