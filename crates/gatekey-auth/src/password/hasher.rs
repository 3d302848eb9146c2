//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use gatekey_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// A malformed stored hash verifies as `false` rather than erroring,
    /// so a corrupted row cannot be told apart from a wrong password.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("longenough1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("longenough1", &hash));
        assert!(!hasher.verify_password("longenough2", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("longenough1").unwrap();
        let b = hasher.hash_password("longenough1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_password("longenough1", "not-a-phc-string"));
        assert!(!hasher.verify_password("longenough1", ""));
    }
}
