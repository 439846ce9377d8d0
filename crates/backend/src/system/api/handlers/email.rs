use axum::extract::Json;
use contracts::system::email::{SendEmailRequest, SendEmailResponse};

use crate::shared::error::ApiResult;
use crate::system::auth::extractor::Actor;
use crate::system::email::service;

/// POST /api/system/email (admin only)
pub async fn send(actor: Actor, Json(request): Json<SendEmailRequest>) -> ApiResult<Json<SendEmailResponse>> {
    Ok(Json(service::send(request, &actor, "email", None).await?))
}
