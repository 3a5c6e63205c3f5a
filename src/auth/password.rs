//! Password hashing and verification.
//!
//! Credentials are hashed with Argon2id before persistence; the stored
//! PHC string embeds salt and parameters. Verification re-derives the
//! hash and compares in constant time inside the argon2 crate.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::ApiError;

/// Hashes a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies `password` against a stored PHC hash string.
///
/// Verification uses the parameters embedded in the hash itself and is
/// the constant-time comparison required by the login flow.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| ApiError::Internal(format!("parse hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let Ok(hash) = hash_password("correct horse battery") else {
            panic!("hashing failed");
        };
        assert!(!hash.is_empty());
        assert_eq!(verify_password("correct horse battery", &hash).ok(), Some(true));
        assert_eq!(verify_password("wrong password here", &hash).ok(), Some(false));
    }

    #[test]
    fn same_password_different_salts() {
        let Ok(hash1) = hash_password("same password in") else {
            panic!("hashing failed");
        };
        let Ok(hash2) = hash_password("same password in") else {
            panic!("hashing failed");
        };
        assert_ne!(hash1, hash2);
        assert_eq!(verify_password("same password in", &hash1).ok(), Some(true));
        assert_eq!(verify_password("same password in", &hash2).ok(), Some(true));
    }

    #[test]
    fn garbage_hash_is_internal_error() {
        let result = verify_password("anything at all", "not-a-phc-string");
        assert!(result.is_err());
    }
}
