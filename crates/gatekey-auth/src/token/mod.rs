//! Access token encoding, decoding, and claims.

pub mod claims;
pub mod issuer;

pub use claims::AccessClaims;
pub use issuer::TokenIssuer;
