use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tokio::sync::OnceCell;

use crate::shared::config;
use crate::shared::data::db::get_connection;

const JWT_SECRET_KEY: &str = "jwt_secret";

static JWT_SECRET: OnceCell<String> = OnceCell::const_new();

/// Время жизни access-токена в секундах
pub fn access_token_lifetime_secs() -> i64 {
    config::get().auth.access_token_hours * 3600
}

pub fn build_claims(user_id: &str, username: &str, is_admin: bool, lifetime_secs: i64) -> TokenClaims {
    let now = Utc::now().timestamp();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        exp: (now + lifetime_secs) as usize,
        iat: now as usize,
    }
}

pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Generate JWT access token
pub async fn generate_access_token(user_id: &str, username: &str, is_admin: bool) -> Result<String> {
    let claims = build_claims(user_id, username, is_admin, access_token_lifetime_secs());
    let secret = get_jwt_secret().await?;
    encode_token(&claims, secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_token(token, secret)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Calculate refresh token expiration timestamp
pub fn calculate_refresh_token_expiration() -> String {
    let exp = Utc::now() + chrono::Duration::days(config::get().auth.refresh_token_days);
    exp.to_rfc3339()
}

/// Секрет читается из sys_settings один раз, при отсутствии генерируется и сохраняется
pub async fn get_jwt_secret() -> Result<&'static str> {
    let secret = JWT_SECRET
        .get_or_try_init(|| async {
            if let Some(secret) = get_jwt_secret_from_db().await? {
                return Ok::<String, anyhow::Error>(secret);
            }
            let secret = generate_jwt_secret();
            save_jwt_secret_to_db(&secret).await?;
            tracing::info!("Generated new JWT secret");
            Ok(secret)
        })
        .await?;
    Ok(secret.as_str())
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                JWT_SECRET_KEY.into(),
                secret.to_string().into(),
                "Auto-generated JWT secret for authentication".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let claims = build_claims("u-1", "manager", true, 3600);
        let token = encode_token(&claims, "test-secret").unwrap();
        let decoded = decode_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.username, "manager");
        assert!(decoded.is_admin);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn wrong_secret_rejected() {
        let claims = build_claims("u-1", "manager", false, 3600);
        let token = encode_token(&claims, "secret-a").unwrap();
        assert!(decode_token(&token, "secret-b").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // leeway по умолчанию 60 секунд
        let claims = build_claims("u-1", "manager", false, -3600);
        let token = encode_token(&claims, "s").unwrap();
        assert!(decode_token(&token, "s").is_err());
    }

    #[test]
    fn generated_secret_is_256_bit() {
        use base64::{engine::general_purpose, Engine as _};
        let secret = generate_jwt_secret();
        assert_eq!(general_purpose::STANDARD.decode(secret).unwrap().len(), 32);
    }
}
