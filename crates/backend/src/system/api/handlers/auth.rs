use axum::{extract::Json, http::StatusCode};
use contracts::system::audit::AuditAction;
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo};
use contracts::system::users::User;

use crate::shared::error::{ApiResult, ServiceError};
use crate::system::audit::service as audit;
use crate::system::auth::extractor::{Actor, ClientInfo, CurrentUser};
use crate::system::auth::{jwt, login_attempts};
use crate::system::sessions::service as sessions;
use crate::system::users::service as user_service;

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        is_admin: user.is_admin,
    }
}

fn anonymous(username: &str, client: &ClientInfo) -> Actor {
    Actor {
        username: Some(username.to_string()),
        ip_address: client.ip_address.clone(),
        ..Default::default()
    }
}

/// Login handler
pub async fn login(
    client: ClientInfo,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let username = request.username.trim().to_string();
    let ip = client.ip_address.as_deref();

    if login_attempts::is_locked_out(&username).await? {
        tracing::warn!("Login rejected for locked account '{}' from {:?}", username, ip);
        let minutes = crate::shared::config::get().auth.lockout_minutes;
        return Err(ServiceError::Locked(format!(
            "Слишком много неудачных попыток. Повторите через {} мин.",
            minutes
        ))
        .into());
    }

    let user = match user_service::verify_credentials(&username, &request.password).await? {
        Some(user) => user,
        None => {
            login_attempts::record(&username, ip, false).await?;
            audit::record(
                &anonymous(&username, &client),
                AuditAction::LoginFailed,
                "session",
                None,
                None,
            )
            .await;
            return Err(ServiceError::Unauthorized.into());
        }
    };

    login_attempts::record(&user.username, ip, true).await?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;
    let refresh_token = sessions::open(&user.id, &client).await?;

    let actor = Actor {
        user_id: Some(user.id.clone()),
        username: Some(user.username.clone()),
        is_admin: user.is_admin,
        ip_address: client.ip_address.clone(),
    };
    audit::record(&actor, AuditAction::LoginSuccess, "session", None, client.user_agent.clone()).await;
    tracing::info!("User '{}' logged in from {:?}", user.username, ip);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        expires_in: jwt::access_token_lifetime_secs(),
        user: user_info(user),
    }))
}

/// Refresh token handler
pub async fn refresh(Json(request): Json<RefreshRequest>) -> ApiResult<Json<RefreshResponse>> {
    let user_id = sessions::validate_refresh_token(&request.refresh_token).await?;

    let user = user_service::get_by_id(&user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(ServiceError::Unauthorized)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: jwt::access_token_lifetime_secs(),
    }))
}

/// Logout handler
pub async fn logout(client: ClientInfo, Json(request): Json<RefreshRequest>) -> ApiResult<StatusCode> {
    let user_id = sessions::validate_refresh_token(&request.refresh_token).await.ok();
    if sessions::revoke_token(&request.refresh_token).await? {
        let actor = Actor {
            user_id,
            ip_address: client.ip_address,
            ..Default::default()
        };
        audit::record(&actor, AuditAction::Logout, "session", None, None).await;
    }
    Ok(StatusCode::OK)
}

/// Get current user handler (protected by middleware)
pub async fn current_user(CurrentUser(claims): CurrentUser) -> ApiResult<Json<UserInfo>> {
    let user = user_service::get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь", &claims.sub))?;
    Ok(Json(user_info(user)))
}
