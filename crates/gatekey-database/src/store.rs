//! Store traits consumed by the session lifecycle manager.
//!
//! The manager never talks to a concrete backend; it holds trait objects so
//! the same protocol code runs against PostgreSQL in production and the
//! in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gatekey_core::result::AppResult;
use gatekey_entity::session::{CreateSession, Session};
use gatekey_entity::user::{CreateUser, User};

/// Durable user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persist a new user. Fails with a conflict error when the email is
    /// already taken.
    async fn create_user(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Durable session records.
///
/// `conditionally_revoke` is the one operation that must be atomic:
/// implementations guarantee that for a given session, at most one caller
/// ever observes `true`. Everything else may run at read isolation.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new active session.
    async fn create_session(&self, data: &CreateSession) -> AppResult<Session>;

    /// List active (unrevoked, unexpired) sessions for one user.
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// List all active sessions. Candidate set for refresh secret
    /// resolution, which has no reverse index from secret to row.
    async fn find_all_active(&self) -> AppResult<Vec<Session>>;

    /// Revoke the session iff it is still active, stamping `revoked_at`
    /// and `last_used_at` with `now`. Returns `true` iff the session was
    /// active and this call revoked it.
    async fn conditionally_revoke(&self, session_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// Revoke every active session of one user. Idempotent; returns the
    /// number of sessions transitioned.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}
