//! Error codes for the gateway's client-facing responses.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses. Authentication failures deliberately share
//! a single code whatever the internal reason was.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing or rejected bearer credential
    Unauthorized,
    /// No configured route matches the request path
    NotFound,
    /// Request body exceeds the configured ceiling
    PayloadTooLarge,
    /// The inbound request could not be read
    BadRequest,
    /// Backend unreachable or its response unreadable
    BadGateway,
    /// Backend exceeded the forwarding deadline
    GatewayTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadGateway => "BAD_GATEWAY",
            Self::GatewayTimeout => "GATEWAY_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 8] = [
        Self::Unauthorized,
        Self::NotFound,
        Self::PayloadTooLarge,
        Self::BadRequest,
        Self::BadGateway,
        Self::GatewayTimeout,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
