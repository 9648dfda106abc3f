use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthRejection;
use crate::errors::ErrorCode;
use crate::middleware::request_trace;
use crate::proxy::UpstreamError;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Boundary error for every gateway-generated response.
///
/// `Display` carries internal detail for logs; the client only ever sees the
/// fixed text from [`AppError::detail`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No route for path: {path}")]
    NoRoute { path: String },
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: AuthRejection },
    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NoRoute { .. } => ErrorCode::NotFound,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::Upstream(UpstreamError::Timeout(_)) => ErrorCode::GatewayTimeout,
            AppError::Upstream(_) => ErrorCode::BadGateway,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing detail. Never derived from the internal cause.
    fn detail(&self) -> &'static str {
        match self.code() {
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::NotFound => "No route matches the request path",
            ErrorCode::PayloadTooLarge => "Request body exceeds the allowed size",
            ErrorCode::BadRequest => "Request body could not be read",
            ErrorCode::BadGateway => "Upstream service unavailable",
            ErrorCode::GatewayTimeout => "Upstream service timed out",
            ErrorCode::Internal | ErrorCode::ConfigError => "Internal server error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
            ErrorCode::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::Internal | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn no_route(path: &str) -> Self {
        Self::NoRoute {
            path: path.to_string(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<AuthRejection> for AppError {
    fn from(reason: AuthRejection) -> Self {
        AppError::Unauthorized { reason }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = request_trace::current_request_id().unwrap_or_else(|| "unknown".to_string());

        let problem_details = ProblemDetails {
            type_: format!("/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(problem_details)
    }
}
