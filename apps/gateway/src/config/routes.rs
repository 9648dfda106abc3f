//! Route table configuration.
//!
//! Either the built-in three-service table, with backend URLs taken from the
//! environment, or a full override from `GATEWAY_ROUTES`:
//!
//! ```text
//! GATEWAY_ROUTES=/auth|http://auth:8080|public,/users|http://users:8080|protected
//! ```
//!
//! Entries keep their order; the first matching prefix wins at request time.

use reqwest::Url;

use crate::routing::RouteEntry;
use crate::AppError;

pub const AUTH_SERVICE_URL: &str = "AUTH_SERVICE_URL";
pub const USER_SERVICE_URL: &str = "USER_SERVICE_URL";
pub const ANIME_SERVICE_URL: &str = "ANIME_SERVICE_URL";

/// `(prefix, env var, fallback url, requires_auth)`, in priority order.
const DEFAULT_TABLE: [(&str, &str, &str, bool); 3] = [
    ("/auth", AUTH_SERVICE_URL, "http://auth-service:8080", false),
    ("/users", USER_SERVICE_URL, "http://user-service:8080", true),
    ("/anime", ANIME_SERVICE_URL, "http://anime-service:8080", true),
];

/// Built-in table: `/auth` public, `/users` and `/anime` protected.
pub fn default_routes<F>(lookup: F) -> Result<Vec<RouteEntry>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    DEFAULT_TABLE
        .iter()
        .map(|&(prefix, var, fallback, requires_auth)| {
            let raw = lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            RouteEntry::new(prefix, parse_backend(var, &raw)?, requires_auth)
        })
        .collect()
}

/// Parse a comma-separated `prefix|url|public-or-protected` list.
pub fn parse_routes(table: &str) -> Result<Vec<RouteEntry>, AppError> {
    let mut entries = Vec::new();

    for item in table.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parts: Vec<&str> = item.split('|').map(str::trim).collect();
        let [prefix, url, access] = parts.as_slice() else {
            return Err(AppError::config(format!(
                "Route entry '{item}' must have the form prefix|url|public-or-protected"
            )));
        };

        let requires_auth = if access.eq_ignore_ascii_case("protected") {
            true
        } else if access.eq_ignore_ascii_case("public") {
            false
        } else {
            return Err(AppError::config(format!(
                "Unknown access mode '{access}' for route '{prefix}'"
            )));
        };

        entries.push(RouteEntry::new(
            prefix,
            parse_backend(prefix, url)?,
            requires_auth,
        )?);
    }

    if entries.is_empty() {
        return Err(AppError::config("GATEWAY_ROUTES is set but contains no routes"));
    }
    Ok(entries)
}

fn parse_backend(label: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw)
        .map_err(|e| AppError::config(format!("Invalid backend URL for '{label}': '{raw}' ({e})")))
}
