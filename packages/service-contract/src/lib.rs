//! Contract shared between the gateway and the services behind it.
//!
//! The gateway is the only component allowed to set the trusted identity
//! headers; backends read them through [`TrustedIdentity`] and call each other
//! through typed clients such as [`UserClient`].

pub mod identity;
pub mod user_client;

/// Header carrying the verified subject identifier as a decimal integer.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the verified email (possibly empty).
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Correlation header propagated across service hops.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub use identity::{IdentityError, TrustedIdentity};
pub use user_client::{ClientError, User, UserClient};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gateway_test_support::logging::init();
}
