//! Session lifecycle manager — signup, signin, rotation, and revocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use gatekey_core::config::auth::AuthConfig;
use gatekey_core::error::AppError;
use gatekey_database::store::{SessionStore, UserStore};
use gatekey_entity::session::CreateSession;
use gatekey_entity::user::{CreateUser, User};

use crate::password::PasswordHasher;
use crate::refresh::RefreshSecretCodec;
use crate::token::TokenIssuer;

/// Result of a successful signup, signin, or rotation.
///
/// The refresh secret is plaintext here and nowhere else; it goes to the
/// client once and only its hash survives in the store.
#[derive(Clone)]
pub struct IssuedSession {
    /// Owning user.
    pub user_id: Uuid,
    /// The new session row.
    pub session_id: Uuid,
    /// Signed access token.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Plaintext refresh secret, transmitted exactly once.
    pub refresh_secret: String,
    /// Refresh session expiry.
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedSession")
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

/// Orchestrates the session lifecycle over the store traits.
///
/// Stateless apart from configuration: every request-handling task shares
/// one manager and all durable state lives behind the stores.
#[derive(Clone)]
pub struct SessionManager {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
    /// Access token signing and verification.
    token_issuer: Arc<TokenIssuer>,
    /// Password hashing.
    password_hasher: PasswordHasher,
    /// Refresh secret generation and hashing.
    refresh_codec: RefreshSecretCodec,
    /// Refresh session lifetime.
    refresh_ttl: chrono::Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        token_issuer: Arc<TokenIssuer>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            token_issuer,
            password_hasher: PasswordHasher::new(),
            refresh_codec: RefreshSecretCodec::new(),
            refresh_ttl: chrono::Duration::days(config.refresh_ttl_days as i64),
        }
    }

    /// Registers a new user and opens their first session.
    ///
    /// The email is normalized to lowercase before the uniqueness check;
    /// the store's unique index backs that check against concurrent
    /// signups of the same address.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already exists"));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .users
            .create_user(&CreateUser {
                email: email.clone(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");

        self.create_session(user.id, Some(&email), user_agent, ip)
            .await
    }

    /// Authenticates credentials and opens a new session.
    pub async fn signin(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        let user = self.authenticate(email, password).await?;
        self.create_session(user.id, Some(&user.email), user_agent, ip)
            .await
    }

    /// Verifies credentials against the stored password hash.
    ///
    /// Unknown email and wrong password return the identical failure so
    /// responses cannot be used to enumerate registered addresses.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(invalid_credentials());
        };

        if !self.password_hasher.verify_password(password, &user.password_hash) {
            return Err(invalid_credentials());
        }

        Ok(user)
    }

    /// Opens a new session for the user: generates a refresh secret,
    /// stores its hash, and signs an access token bound to
    /// `(user_id, session_id)`.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        let refresh_secret = self.refresh_codec.generate();
        let refresh_token_hash = self.refresh_codec.hash_secret(&refresh_secret)?;
        let expires_at = Utc::now() + self.refresh_ttl;

        let session = self
            .sessions
            .create_session(&CreateSession {
                user_id,
                refresh_token_hash,
                user_agent: user_agent.map(String::from),
                ip: ip.map(String::from),
                expires_at,
            })
            .await?;

        let (access_token, access_expires_at) =
            self.token_issuer.sign_access(user_id, session.id, email)?;

        info!(user_id = %user_id, session_id = %session.id, "Session created");

        Ok(IssuedSession {
            user_id,
            session_id: session.id,
            access_token,
            access_expires_at,
            refresh_secret,
            refresh_expires_at: expires_at,
        })
    }

    /// Rotates a refresh secret: consumes the presented secret's session
    /// and issues a replacement lineage.
    ///
    /// 1. Resolve the active session whose stored hash verifies against
    ///    the presented secret. Secrets are stored one-way, so resolution
    ///    walks the active candidate set.
    /// 2. No match — forged, stale, or already-consumed secret.
    /// 3. Conditionally revoke the matched session. The store's
    ///    compare-and-set admits exactly one winner per secret; a loser
    ///    here means the secret was consumed concurrently.
    /// 4. Create the replacement session. The revoked row stays behind as
    ///    the audit record of the consumed secret.
    pub async fn rotate(
        &self,
        presented_secret: &str,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        let Some(session) = self.resolve_active(presented_secret).await? else {
            warn!("Refresh with unknown or consumed secret");
            return Err(AppError::authentication("Invalid or expired session"));
        };

        if !self
            .sessions
            .conditionally_revoke(session.id, Utc::now())
            .await?
        {
            warn!(
                session_id = %session.id,
                user_id = %session.user_id,
                "Lost rotation race; refresh secret presented twice"
            );
            return Err(AppError::authorization("Session rotation failed"));
        }

        let issued = self
            .create_session(session.user_id, None, user_agent, ip)
            .await?;

        info!(
            user_id = %session.user_id,
            old_session_id = %session.id,
            new_session_id = %issued.session_id,
            "Session rotated"
        );

        Ok(issued)
    }

    /// Revokes the session matching the presented secret, if any.
    ///
    /// Missing and unresolvable secrets are a no-op: signout never fails.
    pub async fn signout(&self, presented_secret: &str) -> Result<(), AppError> {
        if let Some(session) = self.resolve_active(presented_secret).await? {
            self.sessions
                .conditionally_revoke(session.id, Utc::now())
                .await?;
            info!(
                user_id = %session.user_id,
                session_id = %session.id,
                "Session revoked on signout"
            );
        }
        Ok(())
    }

    /// Revokes one session. Idempotent: already-revoked and expired
    /// sessions are left as they are.
    pub async fn revoke_session(&self, session_id: Uuid) -> Result<(), AppError> {
        self.sessions
            .conditionally_revoke(session_id, Utc::now())
            .await?;
        Ok(())
    }

    /// Revokes every active session of a user ("sign out everywhere").
    /// Returns the number of sessions transitioned.
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> Result<u64, AppError> {
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        if revoked > 0 {
            info!(user_id = %user_id, revoked, "Revoked all user sessions");
        }
        Ok(revoked)
    }

    /// Finds the active session whose hash verifies against the secret.
    async fn resolve_active(
        &self,
        presented_secret: &str,
    ) -> Result<Option<gatekey_entity::session::Session>, AppError> {
        let candidates = self.sessions.find_all_active().await?;
        Ok(candidates
            .into_iter()
            .find(|s| self.refresh_codec.verify_secret(presented_secret, &s.refresh_token_hash)))
    }
}

/// Uniform credential failure shared by every authentication miss.
fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid credentials")
}

/// Lowercases and trims an email for lookup and storage.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let issued = IssuedSession {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            access_token: "token".to_string(),
            access_expires_at: Utc::now(),
            refresh_secret: "super-secret".to_string(),
            refresh_expires_at: Utc::now(),
        };
        let rendered = format!("{issued:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
