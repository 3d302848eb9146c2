//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// Bind address and cross-origin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed to make credentialed cross-origin requests.
    /// Must be a concrete origin: credentialed CORS forbids wildcards.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl ServerConfig {
    /// The socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}
