//! Refresh cookie binding.
//!
//! The refresh secret travels only in an http-only cookie scoped to the
//! refresh endpoint. Clearing reuses the exact same scoping attributes so
//! browsers match and drop the cookie instead of orphaning it.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use gatekey_core::config::auth::AuthConfig;
use gatekey_core::config::cookie::CookieConfig;

/// Path the refresh cookie is scoped to. Must match the mounted route.
const REFRESH_PATH: &str = "/auth/refresh";

/// Builds and clears the refresh cookie with fixed scoping attributes.
#[derive(Debug, Clone)]
pub struct CookieBinder {
    /// Cookie name.
    name: String,
    /// Whether to set the `Secure` attribute.
    secure: bool,
    /// Cookie lifetime, equal to the refresh session TTL.
    max_age: Duration,
}

impl CookieBinder {
    /// Creates a binder from cookie and auth configuration.
    pub fn new(cookie_config: &CookieConfig, auth_config: &AuthConfig) -> Self {
        Self {
            name: cookie_config.refresh_name.clone(),
            secure: cookie_config.secure,
            max_age: Duration::days(auth_config.refresh_ttl_days as i64),
        }
    }

    /// The configured cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the refresh cookie carrying the given secret.
    pub fn bind(&self, secret: &str) -> Cookie<'static> {
        Cookie::build((self.name.clone(), secret.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path(REFRESH_PATH)
            .secure(self.secure)
            .max_age(self.max_age)
            .build()
    }

    /// Builds the removal cookie: identical scoping, empty value, zero
    /// lifetime.
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path(REFRESH_PATH)
            .secure(self.secure)
            .max_age(Duration::ZERO)
            .build()
    }
}
