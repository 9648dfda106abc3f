use tracing::warn;

use crate::auth::AuthRejection;
use crate::middleware::request_trace;

/// Log a rejected credential with its internal reason.
///
/// The client only ever sees the uniform 401; this event is the one place
/// the actual reason is recorded.
pub fn auth_rejected(reason: AuthRejection, route: &str, path: &str) {
    let trace_id = request_trace::current_request_id().unwrap_or_else(|| "unknown".to_string());

    warn!(
        event = "SECURITY_AUTH_REJECTED",
        %trace_id,
        reason = reason.reason(),
        route,
        path,
        "Authentication failure"
    );
}
