//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuance response. The refresh secret is not here; it travels
/// only in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
}

/// Authenticated identity echo for `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// User ID.
    pub id: Uuid,
    /// Session the presented token was issued under.
    pub session_id: Uuid,
    /// Email at token issuance, when the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok" when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since process start.
    pub uptime_seconds: u64,
}
