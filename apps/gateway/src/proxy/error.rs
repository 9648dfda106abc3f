use std::time::Duration;

use thiserror::Error;

/// Failure of a forwarded exchange. The text is for logs only.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}
