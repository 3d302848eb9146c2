//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use gatekey_auth::session::SessionManager;
use gatekey_auth::token::TokenIssuer;
use gatekey_core::config::AppConfig;

use crate::cookie::CookieBinder;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All heavyweight
/// fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Access token issuer/verifier.
    pub token_issuer: Arc<TokenIssuer>,
    /// Refresh cookie binder.
    pub cookies: CookieBinder,
    /// Process start time, for the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    /// Assembles the state from its wired dependencies.
    pub fn new(
        config: Arc<AppConfig>,
        session_manager: Arc<SessionManager>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        let cookies = CookieBinder::new(&config.cookie, &config.auth);
        Self {
            config,
            session_manager,
            token_issuer,
            cookies,
            started_at: Instant::now(),
        }
    }
}
