use anyhow::Result;
use chrono::Utc;
use contracts::shared::validation::validate_email;
use contracts::system::audit::AuditAction;
use contracts::system::users::{validate_username, ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::shared::error::ServiceError;
use crate::system::audit::service as audit;
use crate::system::auth::extractor::Actor;
use crate::system::auth::password;

const ENTITY: &str = "user";

fn normalize_email(email: Option<String>) -> Result<Option<String>> {
    match email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()) {
        Some(email) => {
            validate_email(&email).map_err(ServiceError::validation)?;
            Ok(Some(email))
        }
        None => Ok(None),
    }
}

/// Создать учётную запись. С `is_admin = true` создаётся привилегированный пользователь.
pub async fn create(dto: CreateUserDto, actor: &Actor) -> Result<String> {
    let username = dto.username.trim().to_string();
    validate_username(&username).map_err(ServiceError::validation)?;

    if repository::get_by_username(&username).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "Пользователь «{}» уже существует",
            username
        )));
    }

    let email = normalize_email(dto.email)?;
    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user = new_user(username, email, dto.full_name, dto.is_admin, actor.user_id.clone());
    repository::create_with_password(&user, &password_hash).await?;

    tracing::info!(
        "User '{}' created by {:?} (admin: {})",
        user.username,
        actor.username,
        user.is_admin
    );
    audit::record(
        actor,
        AuditAction::UserCreated,
        ENTITY,
        Some(&user.id),
        Some(format!(
            "{}{}",
            user.username,
            if user.is_admin { " (администратор)" } else { "" }
        )),
    )
    .await;

    Ok(user.id)
}

fn new_user(
    username: String,
    email: Option<String>,
    full_name: Option<String>,
    is_admin: bool,
    created_by: Option<String>,
) -> User {
    let now = Utc::now().to_rfc3339();
    User {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        email,
        full_name: full_name.filter(|n| !n.trim().is_empty()),
        is_active: true,
        is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    }
}

/// Начальная учётная запись администратора. Политика паролей не применяется.
pub async fn create_bootstrap_admin(username: &str, password_plain: &str) -> Result<String> {
    let user = new_user(
        username.to_string(),
        None,
        Some("Администратор".to_string()),
        true,
        None,
    );
    let password_hash = password::hash_password(password_plain)?;
    repository::create_with_password(&user, &password_hash).await?;
    Ok(user.id)
}

pub async fn update(dto: UpdateUserDto, actor: &Actor) -> Result<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь", &dto.id))?;

    let loses_admin = user.is_admin && (!dto.is_admin || !dto.is_active);
    if loses_admin && repository::count_other_active_admins(&user.id).await? == 0 {
        return Err(ServiceError::validation(
            "Нельзя отключить последнего администратора",
        ));
    }

    user.email = normalize_email(dto.email)?;
    user.full_name = dto.full_name.filter(|n| !n.trim().is_empty());
    user.is_active = dto.is_active;
    user.is_admin = dto.is_admin;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;
    audit::record(actor, AuditAction::Update, ENTITY, Some(&user.id), Some(user.username.clone())).await;
    Ok(())
}

pub async fn delete(id: &str, actor: &Actor) -> Result<bool> {
    if actor.user_id.as_deref() == Some(id) {
        return Err(ServiceError::validation("Нельзя удалить собственную учётную запись"));
    }
    let Some(user) = repository::get_by_id(id).await? else {
        return Ok(false);
    };
    if user.is_admin && repository::count_other_active_admins(id).await? == 0 {
        return Err(ServiceError::validation("Нельзя удалить последнего администратора"));
    }
    let deleted = repository::delete(id).await?;
    if deleted {
        audit::record(actor, AuditAction::Delete, ENTITY, Some(id), Some(user.username)).await;
    }
    Ok(deleted)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Смена пароля: свой с подтверждением старого, чужой только администратором
pub async fn change_password(dto: ChangePasswordDto, actor: &Actor) -> Result<()> {
    let requester_id = actor.user_id.clone().ok_or(ServiceError::Forbidden)?;
    let user = repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь", &dto.user_id))?;

    if dto.user_id != requester_id {
        if !actor.is_admin {
            return Err(ServiceError::Forbidden.into());
        }
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::validation("Укажите текущий пароль"))?;
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::validation("Текущий пароль указан неверно"));
        }
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(&dto.user_id, &new_hash).await?;

    audit::record(
        actor,
        AuditAction::PasswordChanged,
        ENTITY,
        Some(&user.id),
        Some(user.username),
    )
    .await;
    Ok(())
}

/// Проверка логина и пароля. `Ok(None)` при неверной паре.
pub async fn verify_credentials(username: &str, password_plain: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        return Err(ServiceError::Forbidden.into());
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password_plain, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}
