use actix_web::http::header::HeaderValue;

use super::AuthRejection;

/// Pull the token out of an `Authorization` header value.
///
/// Accepts exactly `<scheme> <token>` where the scheme is `Bearer` in any
/// case and a single space separates the two.
pub fn extract_bearer(header: Option<&HeaderValue>) -> Result<&str, AuthRejection> {
    let raw = header.ok_or(AuthRejection::MissingCredential)?;
    let raw = raw
        .to_str()
        .map_err(|_| AuthRejection::MalformedCredential)?;
    parse_bearer(raw)
}

pub fn parse_bearer(raw: &str) -> Result<&str, AuthRejection> {
    if raw.is_empty() {
        return Err(AuthRejection::MissingCredential);
    }

    let (scheme, token) = raw
        .split_once(' ')
        .ok_or(AuthRejection::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.starts_with(' ') {
        return Err(AuthRejection::MalformedCredential);
    }

    Ok(token)
}
