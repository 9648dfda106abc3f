use super::security_config::SecurityConfig;
use crate::auth::TokenVerifier;
use crate::config::GatewayConfig;
use crate::proxy::Forwarder;
use crate::routing::{RouteEntry, RouteTable};
use crate::AppError;

/// Read-only state shared by every request.
///
/// Built once at startup and never mutated, so workers read it without
/// synchronization.
pub struct AppState {
    pub verifier: TokenVerifier,
    pub routes: RouteTable,
    pub forwarder: Forwarder,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AppError> {
        Self::new(
            &config.security,
            config.routes.clone(),
            Forwarder::new(config.upstream_timeout)?,
            config.max_body_bytes,
        )
    }

    pub fn new(
        security: &SecurityConfig,
        routes: Vec<RouteEntry>,
        forwarder: Forwarder,
        max_body_bytes: usize,
    ) -> Result<Self, AppError> {
        Ok(Self {
            verifier: TokenVerifier::new(security),
            routes: RouteTable::new(routes)?,
            forwarder,
            max_body_bytes,
        })
    }
}
