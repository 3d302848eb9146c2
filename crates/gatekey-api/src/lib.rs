//! # gatekey-api
//!
//! HTTP surface for Gatekey: the axum router, auth handlers, refresh
//! cookie binding, bearer-token extraction, and error-response mapping.

pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use cookie::CookieBinder;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
