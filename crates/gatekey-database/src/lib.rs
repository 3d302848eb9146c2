//! # gatekey-database
//!
//! Session store contracts and their implementations: PostgreSQL via sqlx
//! for production, and an in-memory store with identical conditional-revoke
//! semantics for single-node development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::session::PgSessionStore;
pub use repositories::user::PgUserStore;
pub use store::{SessionStore, UserStore};
