#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod routing;
pub mod state;

pub use auth::{mint_access_token, AuthRejection, IdentityClaims, TokenVerifier};
pub use config::GatewayConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use middleware::{RequestTrace, StructuredLogger};
pub use routing::{RouteEntry, RouteTable};
pub use state::{AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gateway_test_support::logging::init();
}
