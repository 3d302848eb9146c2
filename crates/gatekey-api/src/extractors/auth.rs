//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header and validates it.
//!
//! Verification is stateless: signature and expiry only. A token issued
//! under a since-revoked session stays usable until its own short TTL
//! runs out.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use gatekey_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated identity available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject.
    pub user_id: Uuid,
    /// Session the token was issued under.
    pub session_id: Uuid,
    /// Email at issuance, when the token carried one.
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))
            .map_err(ApiError::from)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))
            .map_err(ApiError::from)?;

        let claims = state.token_issuer.verify_access(token)?;

        Ok(AuthUser {
            user_id: claims.user_id(),
            session_id: claims.session_id(),
            email: claims.email,
        })
    }
}
