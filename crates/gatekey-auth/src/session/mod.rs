//! Session lifecycle management: creation, rotation, and revocation.

pub mod manager;

pub use manager::{IssuedSession, SessionManager};
