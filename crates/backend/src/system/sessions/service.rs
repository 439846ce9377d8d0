use anyhow::Result;
use contracts::system::audit::AuditAction;
use contracts::system::auth::SessionInfo;

use super::repository::{self, NewSession};
use crate::shared::error::ServiceError;
use crate::system::audit::service as audit;
use crate::system::auth::extractor::{Actor, ClientInfo};
use crate::system::auth::jwt;

/// В базе хранится только SHA-256 от refresh-токена
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Открыть сессию, вернуть refresh-токен
pub async fn open(user_id: &str, client: &ClientInfo) -> Result<String> {
    let token = jwt::generate_refresh_token();
    repository::insert(NewSession {
        user_id,
        token_hash: hash_token(&token),
        expires_at: jwt::calculate_refresh_token_expiration(),
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
    })
    .await?;
    Ok(token)
}

/// Проверить refresh-токен и отметить использование. Возвращает id пользователя.
pub async fn validate_refresh_token(token: &str) -> Result<String> {
    let (session_id, user_id) = repository::find_active_by_hash(&hash_token(token))
        .await?
        .ok_or(ServiceError::Unauthorized)?;
    repository::touch(&session_id).await?;
    Ok(user_id)
}

pub async fn revoke_token(token: &str) -> Result<bool> {
    repository::revoke_by_hash(&hash_token(token)).await
}

/// Администратор видит все сессии, остальные только свои
pub async fn list_for(actor: &Actor) -> Result<Vec<SessionInfo>> {
    if actor.is_admin {
        repository::list_active(None).await
    } else {
        let user_id = actor.user_id.as_deref().ok_or(ServiceError::Forbidden)?;
        repository::list_active(Some(user_id)).await
    }
}

pub async fn revoke(id: &str, actor: &Actor) -> Result<()> {
    let session = repository::get_active(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Сессия", id))?;
    if !actor.is_admin && actor.user_id.as_deref() != Some(session.user_id.as_str()) {
        return Err(ServiceError::Forbidden.into());
    }
    repository::revoke_by_id(id).await?;
    audit::record(
        actor,
        AuditAction::SessionRevoked,
        "session",
        Some(id),
        Some(session.username),
    )
    .await;
    Ok(())
}

pub async fn count_active() -> Result<i64> {
    repository::count_active().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_hex_sha256() {
        let hash = hash_token("refresh");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_token("refresh"));
        assert_ne!(hash, hash_token("refresh2"));
    }
}
