use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils::{delete, get_json, post_json, post_no_content, put_json, IdResponse};

/// Fetch all users
pub async fn fetch_users() -> Result<Vec<User>, String> {
    get_json("/api/system/users").await
}

/// Create new user, returns its id
pub async fn create_user(dto: CreateUserDto) -> Result<String, String> {
    let created: IdResponse = post_json("/api/system/users", &dto).await?;
    Ok(created.id)
}

pub async fn update_user(dto: UpdateUserDto) -> Result<(), String> {
    put_json(&format!("/api/system/users/{}", dto.id), &dto).await
}

pub async fn delete_user(id: &str) -> Result<(), String> {
    delete(&format!("/api/system/users/{}", id)).await
}

/// Админ может сменить пароль без старого (`old_password = None`)
pub async fn change_password(dto: ChangePasswordDto) -> Result<(), String> {
    post_no_content(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        &dto,
    )
    .await
}
