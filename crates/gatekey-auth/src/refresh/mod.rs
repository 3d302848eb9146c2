//! Refresh secret generation and hashing.

pub mod codec;

pub use codec::RefreshSecretCodec;
