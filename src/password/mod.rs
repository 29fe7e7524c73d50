//! Password hashing and verification (Argon2id, PHC string encoding).

use argon2::{
    password_hash::{PasswordHash, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    Empty,

    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Salted, adaptive one-way hashing with a fixed work factor (the library's
/// Argon2id defaults). Output is a self-describing PHC string carrying the
/// algorithm tag, parameters, salt, and digest.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Empty`] for an empty password, or
    /// [`PasswordError::Hash`] if the hasher rejects its parameters.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);

        let hashed = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;

        Ok(hashed.to_string())
    }

    /// Recompute with the embedded salt/parameters and compare in constant
    /// time. Returns `false` on mismatch and on a malformed stored hash;
    /// never errors out of a comparison.
    #[must_use]
    pub fn verify(&self, password: &str, hashed: &str) -> bool {
        PasswordHash::new(hashed).map_or(false, |parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
