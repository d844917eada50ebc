//! # Password Hashing
//!
//! Password hashing and verification using Argon2.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the parameters travel with the hash. New hashes always use
//! `Argon2::default()` (Argon2id, fixed cost) and a fresh random salt.
//!
//! Both operations are CPU-bound on purpose. Async callers should use
//! [`hash_password_async`] / [`verify_password_async`] instead of blocking
//! the runtime.

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tracing::{debug, error};

/// Password hashing and verification failures.
///
/// None of the variants carry the plaintext or the stored hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PwdError {
    /// Salt generation or the hash computation itself failed.
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    /// The plaintext does not match the stored hash.
    #[error("Password does not match")]
    Mismatch,

    /// The stored hash is not a usable Argon2 PHC string.
    #[error("Invalid password hash: {0}")]
    MalformedHash(String),

    /// The blocking worker running the computation did not complete.
    #[error("Password worker failed: {0}")]
    Worker(String),
}

/// Hash a password using the Argon2 algorithm.
pub fn hash_password(password: &str) -> Result<String, PwdError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("[PWD] Hashing failed: {}", e);
            PwdError::Hashing(e.to_string())
        })?
        .to_string();

    debug!("[PWD] Password hashed");
    Ok(password_hash)
}

/// Verify a plaintext password against an Argon2 hash.
///
/// Returns `Ok(())` on a match. A wrong password is [`PwdError::Mismatch`];
/// a hash that cannot be parsed or names unsupported parameters is
/// [`PwdError::MalformedHash`]. The comparison itself is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PwdError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        error!("[PWD] Stored hash could not be parsed: {}", e);
        PwdError::MalformedHash(e.to_string())
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => {
            debug!("[PWD] Password mismatch");
            Err(PwdError::Mismatch)
        }
        Err(e) => {
            error!("[PWD] Stored hash is unusable: {}", e);
            Err(PwdError::MalformedHash(e.to_string()))
        }
    }
}

/// [`hash_password`] on tokio's blocking pool.
pub async fn hash_password_async(password: String) -> Result<String, PwdError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PwdError::Worker(e.to_string()))?
}

/// [`verify_password`] on tokio's blocking pool.
pub async fn verify_password_async(password: String, hash: String) -> Result<(), PwdError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PwdError::Worker(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "TestPassword123!";
        let hash = hash_password(password)
            .expect("Password hashing should succeed for valid password");

        assert!(hash.starts_with("$argon2id$"));
        verify_password(password, &hash)
            .expect("Password verification should succeed for correct password");
        assert_eq!(verify_password("WrongPassword", &hash), Err(PwdError::Mismatch));
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).expect("first hash should succeed");
        let hash2 = hash_password(password).expect("second hash should succeed");

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).is_ok());
        assert!(verify_password(password, &hash2).is_ok());
    }

    #[test]
    fn test_empty_password_round_trip() {
        let hash = hash_password("").expect("Empty password should still hash");
        assert!(verify_password("", &hash).is_ok());
        assert_eq!(verify_password(" ", &hash), Err(PwdError::Mismatch));
    }

    #[test]
    fn test_malformed_hash_is_not_a_mismatch() {
        let result = verify_password("whatever", "not-a-phc-string");
        assert!(matches!(result, Err(PwdError::MalformedHash(_))));

        // bcrypt-style modular crypt strings are not PHC strings either
        let result = verify_password(
            "whatever",
            "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy",
        );
        assert!(matches!(result, Err(PwdError::MalformedHash(_))));
    }

    #[test]
    fn test_error_messages_do_not_echo_inputs() {
        let err = verify_password("hunter2", "garbage$hash").unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("hunter2"));
        assert!(!message.contains("garbage$hash"));
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hash = hash_password_async("offloaded".to_string())
            .await
            .expect("Async hashing should succeed");

        verify_password_async("offloaded".to_string(), hash.clone())
            .await
            .expect("Async verification should succeed");
        assert_eq!(
            verify_password_async("other".to_string(), hash).await,
            Err(PwdError::Mismatch)
        );
    }
}
