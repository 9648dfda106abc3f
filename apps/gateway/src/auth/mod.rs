//! Bearer-token verification.
//!
//! Everything here is pure: no I/O, no shared mutable state. The verifier is
//! built once at startup and shared read-only across requests.

pub mod bearer;
pub mod claims;
pub mod jwt;
pub mod rejection;

pub use bearer::extract_bearer;
pub use claims::IdentityClaims;
pub use jwt::{mint_access_token, IssuedClaims, TokenVerifier};
pub use rejection::AuthRejection;
