//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single refresh lineage.
///
/// Each active session corresponds to exactly one currently valid refresh
/// secret, stored only as a one-way hash. Rotation inserts a new row and
/// revokes the old one; rows are never deleted, so revoked sessions remain
/// an audit trail of consumed secrets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Argon2id hash of the currently valid refresh secret.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    /// User-Agent header value at creation.
    pub user_agent: Option<String>,
    /// Client IP at creation.
    pub ip: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last time the refresh secret was presented.
    pub last_used_at: DateTime<Utc>,
    /// When the session expires (absolute).
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked. Non-null means permanently dead.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is active (not revoked and not expired).
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check whether the session has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Argon2id hash of the refresh secret.
    pub refresh_token_hash: String,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Client IP.
    pub ip: Option<String>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "$argon2id$stub".to_string(),
            user_agent: None,
            ip: None,
            created_at: now,
            last_used_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn active_requires_unrevoked_and_unexpired() {
        assert!(session(Duration::hours(1), false).is_active());
        assert!(!session(Duration::hours(1), true).is_active());
        assert!(!session(Duration::seconds(-1), false).is_active());
    }
}
