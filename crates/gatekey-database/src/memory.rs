//! In-memory store using a Tokio mutex for single-node deployments.
//!
//! Implements the same store contracts as the PostgreSQL repositories,
//! including the conditional-revoke atomicity: the mutex guarantees that
//! for one session at most one caller observes `true`. Selected with
//! `database.backend = "memory"`; also the test double for the lifecycle
//! manager and the HTTP surface.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use gatekey_core::error::AppError;
use gatekey_core::result::AppResult;
use gatekey_entity::session::{CreateSession, Session};
use gatekey_entity::user::{CreateUser, User};

use crate::store::{SessionStore, UserStore};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    /// Users keyed by id.
    users: HashMap<Uuid, User>,
    /// Sessions keyed by id. Revoked rows are kept, matching the
    /// never-delete retention of the SQL schema.
    sessions: HashMap<Uuid, Session>,
}

/// In-memory user and session store.
///
/// Suitable for single-node deployments only; state dies with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Creates a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;

        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, data: &CreateSession) -> AppResult<Session> {
        let mut state = self.state.lock().await;

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            refresh_token_hash: data.refresh_token_hash.clone(),
            user_agent: data.user_agent.clone(),
            ip: data.ip.clone(),
            created_at: now,
            last_used_at: now,
            expires_at: data.expires_at,
            revoked_at: None,
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .cloned()
            .collect())
    }

    async fn find_all_active(&self) -> AppResult<Vec<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| s.is_active())
            .cloned()
            .collect())
    }

    async fn conditionally_revoke(&self, session_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;

        match state.sessions.get_mut(&session_id) {
            Some(session) if session.revoked_at.is_none() && session.expires_at > now => {
                session.revoked_at = Some(now);
                session.last_used_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().await;

        let now = Utc::now();
        let mut revoked = 0u64;
        for session in state.sessions.values_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() && session.expires_at > now
            {
                session.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
