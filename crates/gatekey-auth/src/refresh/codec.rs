//! Opaque refresh secret generation and one-way hashing.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use gatekey_core::error::AppError;

/// Raw entropy per secret, before encoding.
const SECRET_BYTES: usize = 32;

/// Generates opaque refresh secrets and hashes them for storage.
///
/// Secrets carry 256 bits of OS entropy and leave the process exactly once,
/// in the issuance response. Only the Argon2id hash is ever persisted, with
/// the same contract as password hashing: verification is one-way and a
/// malformed stored hash verifies as `false`.
#[derive(Debug, Clone, Default)]
pub struct RefreshSecretCodec;

impl RefreshSecretCodec {
    /// Creates a new codec instance.
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh opaque secret (URL-safe base64, no padding).
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hashes a secret for storage using Argon2id with a random salt.
    pub fn hash_secret(&self, secret: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Refresh secret hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a presented secret against a stored hash.
    pub fn verify_secret(&self, secret: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
