//! Header filtering across the proxy hop.
//!
//! Inbound (actix) and outbound (reqwest) use different `http` crate
//! versions, so headers cross as raw name/value bytes.

use std::collections::HashSet;

use actix_web::http::header as actix_header;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use service_contract::{REQUEST_ID_HEADER, USER_EMAIL_HEADER, USER_ID_HEADER};

/// RFC 7230 hop-by-hop headers.
pub const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Rebuilt by the client for the outbound request.
const CLIENT_MANAGED: [&str; 3] = ["host", "content-length", "expect"];

/// Gateway-owned on the outbound request; inbound values are never trusted.
const GATEWAY_OWNED: [&str; 4] = [
    USER_ID_HEADER,
    USER_EMAIL_HEADER,
    REQUEST_ID_HEADER,
    FORWARDED_FOR_HEADER,
];

/// Names listed in `Connection` values are hop-by-hop for this message.
fn connection_tokens<'a>(values: impl Iterator<Item = &'a [u8]>) -> HashSet<String> {
    values
        .filter_map(|v| std::str::from_utf8(v).ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_hop_by_hop(name: &str, listed: &HashSet<String>) -> bool {
    HOP_BY_HOP.contains(&name) || listed.contains(name)
}

/// Headers for the backend request.
///
/// Copies every end-to-end inbound header, appends the caller's address to
/// `X-Forwarded-For` and sets `X-Request-ID`. Identity headers are dropped
/// here and only re-added from verified claims.
pub fn outbound_headers(
    inbound: &actix_header::HeaderMap,
    peer_ip: Option<&str>,
    request_id: &str,
) -> HeaderMap {
    let listed = connection_tokens(
        inbound
            .get_all(actix_header::CONNECTION)
            .map(|v| v.as_bytes()),
    );

    let mut outbound = HeaderMap::with_capacity(inbound.len() + 2);
    for (name, value) in inbound.iter() {
        let lower = name.as_str();
        if is_hop_by_hop(lower, &listed)
            || CLIENT_MANAGED.contains(&lower)
            || GATEWAY_OWNED.contains(&lower)
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            outbound.append(name, value);
        }
    }

    let prior: Vec<&str> = inbound
        .get_all(FORWARDED_FOR_HEADER)
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    let forwarded_for = match (prior.is_empty(), peer_ip) {
        (true, None) => None,
        (true, Some(ip)) => Some(ip.to_string()),
        (false, None) => Some(prior.join(", ")),
        (false, Some(ip)) => Some(format!("{}, {ip}", prior.join(", "))),
    };
    if let Some(value) = forwarded_for.and_then(|v| HeaderValue::from_str(&v).ok()) {
        outbound.insert(HeaderName::from_static(FORWARDED_FOR_HEADER), value);
    }

    if let Ok(value) = HeaderValue::from_str(request_id) {
        outbound.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    outbound
}

/// Backend response headers to relay to the caller.
///
/// Hop-by-hop headers and `Content-Length` are dropped; the server frames
/// the relayed body itself.
pub fn relayed_response_headers(upstream: &HeaderMap) -> actix_header::HeaderMap {
    let listed = connection_tokens(
        upstream
            .get_all(reqwest::header::CONNECTION)
            .iter()
            .map(|v| v.as_bytes()),
    );

    let mut relayed = actix_header::HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        let lower = name.as_str();
        if is_hop_by_hop(lower, &listed) || lower == "content-length" {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            actix_header::HeaderName::from_bytes(lower.as_bytes()),
            actix_header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            relayed.append(name, value);
        }
    }
    relayed
}
