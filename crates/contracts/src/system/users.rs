use serde::{Deserialize, Serialize};

/// Минимальная длина пароля
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl User {
    pub fn role_label(&self) -> &'static str {
        if self.is_admin {
            "Администратор"
        } else {
            "Оператор"
        }
    }
}

/// Создание учётной записи. `is_admin = true` создаёт привилегированную учётку.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None if admin changing someone else's password
    pub new_password: String,
}

/// Политика паролей: не короче 8 символов, хотя бы одна буква и одна цифра
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Пароль должен быть не короче {} символов",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err("Пароль должен содержать хотя бы одну букву".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Пароль должен содержать хотя бы одну цифру".into());
    }
    Ok(())
}

/// Логин: 3–32 символа, латиница, цифры, точка, дефис, подчёркивание
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err("Логин должен содержать от 3 до 32 символов".into());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err("Логин может содержать только латиницу, цифры и символы . - _".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy() {
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("longpassword").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("rental2025").is_ok());
        assert!(validate_password_strength("пароль2025").is_ok());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("john doe").is_err());
        assert!(validate_username("j.doe-1_x").is_ok());
    }
}
