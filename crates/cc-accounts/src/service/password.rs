//! Password Service
//!
//! Argon2id hashing and verification. Plaintext passwords only ever exist on
//! the stack here; they are never persisted or logged.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{AccountsError, Result};

#[derive(Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash_password(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AccountsError::internal(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// One-way comparison of a plaintext candidate against a stored hash.
    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    pub fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AccountsError::internal(format!("stored password hash is invalid: {}", e)))?;
        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
