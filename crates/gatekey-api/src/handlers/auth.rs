//! Auth handlers — signup, signin, refresh, signout, me.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use tracing::error;
use validator::Validate;

use gatekey_core::error::{AppError, ErrorKind};

use crate::dto::request::{SigninRequest, SignupRequest};
use crate::dto::response::{MeResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))
        .map_err(ApiError::from)?;

    let (user_agent, ip) = provenance(&headers);
    let issued = state
        .session_manager
        .signup(&req.email, &req.password, user_agent.as_deref(), ip.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        jar.add(state.cookies.bind(&issued.refresh_secret)),
        Json(TokenResponse {
            access_token: issued.access_token,
        }),
    ))
}

/// POST /auth/signin
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))
        .map_err(ApiError::from)?;

    let (user_agent, ip) = provenance(&headers);
    let issued = state
        .session_manager
        .signin(&req.email, &req.password, user_agent.as_deref(), ip.as_deref())
        .await?;

    Ok((
        jar.add(state.cookies.bind(&issued.refresh_secret)),
        Json(TokenResponse {
            access_token: issued.access_token,
        }),
    ))
}

/// POST /auth/refresh
///
/// The request carries nothing but the refresh cookie. Every expected
/// failure clears the cookie so clients do not loop on a dead secret.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let presented = jar
        .get(state.cookies.name())
        .map(|cookie| cookie.value().to_string());
    let Some(presented) = presented else {
        return (
            jar.add(state.cookies.clear()),
            ApiError(AppError::authentication("Missing refresh token")),
        )
            .into_response();
    };

    let (user_agent, ip) = provenance(&headers);
    match state
        .session_manager
        .rotate(&presented, user_agent.as_deref(), ip.as_deref())
        .await
    {
        Ok(issued) => (
            jar.add(state.cookies.bind(&issued.refresh_secret)),
            Json(TokenResponse {
                access_token: issued.access_token,
            }),
        )
            .into_response(),
        Err(e) if matches!(e.kind, ErrorKind::Authentication | ErrorKind::Authorization) => {
            (jar.add(state.cookies.clear()), ApiError(e)).into_response()
        }
        // Store faults keep the cookie: the secret may still be good once
        // the store is back.
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /auth/signout
///
/// Revokes the session behind the presented cookie and clears it. Always
/// 204: an absent or unresolvable cookie is not an error, and a store
/// fault must not leave the client holding a cookie it cannot shed.
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(state.cookies.name()) {
        if let Err(e) = state.session_manager.signout(cookie.value()).await {
            error!(error = %e, "Failed to revoke session on signout");
        }
    }

    (StatusCode::NO_CONTENT, jar.add(state.cookies.clear()))
}

/// GET /auth/me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user_id,
        session_id: auth.session_id,
        email: auth.email,
    })
}

/// Pulls session provenance from request headers.
fn provenance(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    // Behind a proxy the peer address is meaningless; trust the forwarded
    // header's first hop when present.
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    (user_agent, ip)
}
