//! One-way password hashing for Warbler credentials.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings; the
//! plaintext is never persisted or compared directly. Verification parses
//! the stored hash and checks the candidate against it.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Verify a plaintext candidate against a stored PHC hash string.
///
/// Returns `false` for a wrong password and also for an unparseable hash —
/// a corrupt stored hash must never authenticate anyone.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash("correct horse").unwrap();
        assert!(verify("correct horse", &hashed));
        assert!(!verify("wrong horse", &hashed));
    }

    #[test]
    fn hash_never_equals_plaintext() {
        let hashed = hash("password").unwrap();
        assert_ne!(hashed, "password");
        assert!(hashed.starts_with("$argon2"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("password").unwrap();
        let b = hash("password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_rejects_everything() {
        assert!(!verify("password", "not-a-phc-string"));
        assert!(!verify("", ""));
    }
}
