use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::error::{ApiResult, ServiceError};
use crate::system::auth::extractor::Actor;
use crate::system::users::service;

/// List all users (admin only)
pub async fn list() -> ApiResult<Json<Vec<User>>> {
    Ok(Json(service::list_all().await?))
}

/// Get user by ID (admin only)
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<User>> {
    let user = service::get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь", &id))?;
    Ok(Json(user))
}

/// Create user (admin only). Флаг `is_admin` создаёт привилегированную учётную запись.
pub async fn create(actor: Actor, Json(dto): Json<CreateUserDto>) -> ApiResult<Json<serde_json::Value>> {
    let user_id = service::create(dto, &actor).await?;
    Ok(Json(serde_json::json!({"id": user_id})))
}

/// Update user (admin only)
pub async fn update(
    actor: Actor,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> ApiResult<StatusCode> {
    dto.id = id;
    service::update(dto, &actor).await?;
    Ok(StatusCode::OK)
}

/// Delete user (admin only)
pub async fn delete(actor: Actor, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if service::delete(&id, &actor).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::NotFound(format!("Пользователь не найден: {}", id)).into())
    }
}

/// Change password
pub async fn change_password(
    actor: Actor,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> ApiResult<StatusCode> {
    dto.user_id = id;
    service::change_password(dto, &actor).await?;
    Ok(StatusCode::OK)
}
