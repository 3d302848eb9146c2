//! # gatekey-auth
//!
//! Credential hashing, access token signing/verification, refresh secret
//! handling, and the session lifecycle manager.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and verification
//! - `token` — signed access token creation and validation
//! - `refresh` — opaque refresh secret generation and hashing
//! - `session` — session creation, rotation, and revocation

pub mod password;
pub mod refresh;
pub mod session;
pub mod token;

pub use password::PasswordHasher;
pub use refresh::RefreshSecretCodec;
pub use session::{IssuedSession, SessionManager};
pub use token::{AccessClaims, TokenIssuer};
