use std::time::Duration;

use actix_web::HttpRequest;
use reqwest::Url;
use tokio::time::Instant;

use crate::routing::RouteEntry;

/// Per-request forwarding state. Owned by the handling task and dropped with
/// the response.
#[derive(Debug, Clone)]
pub struct ForwardContext {
    pub request_id: String,
    /// Matched route prefix
    pub prefix: String,
    /// Inbound path as received, before the prefix was stripped
    pub original_path: String,
    /// Backend URL including the rewritten path and original query
    pub target: Url,
    /// Absolute deadline for the whole backend exchange
    pub deadline: Instant,
}

impl ForwardContext {
    /// Starts the deadline clock.
    pub fn begin(route: &RouteEntry, req: &HttpRequest, request_id: String, timeout: Duration) -> Self {
        let original_path = req.path().to_string();
        let target = route.upstream_url(&original_path, req.uri().query());

        Self {
            request_id,
            prefix: route.prefix().to_string(),
            original_path,
            target,
            deadline: Instant::now() + timeout,
        }
    }
}
