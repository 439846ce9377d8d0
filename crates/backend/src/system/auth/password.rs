//! Хеширование паролей (Argon2id, PHC-строка с солью)

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::shared::error::ServiceError;

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("Password hash error: {}", e))
}

/// `Ok(false)` при неверном пароле, `Err` только для испорченного хеша
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Stored hash is invalid: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn validate_password_strength(password: &str) -> Result<()> {
    contracts::system::users::validate_password_strength(password).map_err(ServiceError::validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("wrong-pass1", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salt() {
        let a = hash_password("rental2024").unwrap();
        let b = hash_password("rental2024").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn broken_hash_is_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn weak_passwords_rejected() {
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("fleet2024").is_ok());
    }
}
