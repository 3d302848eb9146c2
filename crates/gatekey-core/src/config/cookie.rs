//! Refresh cookie configuration.

use serde::{Deserialize, Serialize};

/// Refresh cookie naming and transport flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Name of the refresh cookie.
    #[serde(default = "default_refresh_name")]
    pub refresh_name: String,
    /// Whether to set the `Secure` attribute. Off by default so local
    /// plain-HTTP development works; must be on behind TLS.
    #[serde(default)]
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            refresh_name: default_refresh_name(),
            secure: false,
        }
    }
}

fn default_refresh_name() -> String {
    "gk_refresh".to_string()
}
