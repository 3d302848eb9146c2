//! Route definitions for the Gatekey HTTP API.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use gatekey_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through every
/// route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: signup, signin, refresh, signout, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/signout", post(handlers::auth::signout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Liveness endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::health))
}

/// CORS with credentials for the configured frontend origin.
///
/// Credentialed CORS forbids wildcard origins, so the origin must parse;
/// an unparseable value falls back to same-origin only.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match state.config.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(
                origin = %state.config.server.cors_origin,
                "Invalid CORS origin in configuration; cross-origin requests disabled"
            );
            layer
        }
    }
}

/// JSON 404 for unknown routes.
async fn not_found() -> ApiError {
    ApiError(AppError::not_found("Resource not found"))
}
