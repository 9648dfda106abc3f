use std::env;
use std::time::Duration;

use super::routes::{default_routes, parse_routes};
use crate::routing::RouteEntry;
use crate::state::SecurityConfig;
use crate::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub routes: Vec<RouteEntry>,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var("GATEWAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&var, "GATEWAY_PORT", DEFAULT_PORT)?;

        // The secret is taken verbatim; surrounding whitespace is significant.
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::config("Required environment variable 'JWT_SECRET' is not set")
            })?;

        let routes = match var("GATEWAY_ROUTES") {
            Some(table) => parse_routes(&table)?,
            None => default_routes(&lookup)?,
        };

        let timeout_ms = parse_var(
            &var,
            "GATEWAY_UPSTREAM_TIMEOUT_MS",
            DEFAULT_UPSTREAM_TIMEOUT.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(AppError::config(
                "GATEWAY_UPSTREAM_TIMEOUT_MS must be greater than zero",
            ));
        }

        let max_body_bytes = parse_var(&var, "GATEWAY_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;

        Ok(Self {
            host,
            port,
            security: SecurityConfig::new(secret.into_bytes()),
            routes,
            upstream_timeout: Duration::from_millis(timeout_ms),
            max_body_bytes,
        })
    }
}

fn parse_var<T, V>(var: &V, name: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
        }),
    }
}
