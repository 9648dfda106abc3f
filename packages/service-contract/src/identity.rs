//! Backend-side view of the identity the gateway attached to a request.
//!
//! Backends must only be reachable through the gateway for these headers to be
//! meaningful: the gateway strips or overwrites them on every request, so any
//! value seen here was produced by a successful token verification.

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{USER_EMAIL_HEADER, USER_ID_HEADER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIdentity {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("missing user headers")]
    Missing,
    #[error("invalid user id")]
    InvalidUserId,
}

impl TrustedIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, IdentityError> {
        let raw_id = headers
            .get(USER_ID_HEADER)
            .ok_or(IdentityError::Missing)?
            .to_str()
            .map_err(|_| IdentityError::InvalidUserId)?;
        if raw_id.is_empty() {
            return Err(IdentityError::Missing);
        }

        let user_id = raw_id
            .parse::<i64>()
            .map_err(|_| IdentityError::InvalidUserId)?;

        // The gateway always sends the email header, possibly empty.
        let email = headers
            .get(USER_EMAIL_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        Ok(Self { user_id, email })
    }
}

impl ResponseError for IdentityError {
    fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::Missing => StatusCode::UNAUTHORIZED,
            IdentityError::InvalidUserId => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

impl FromRequest for TrustedIdentity {
    type Error = IdentityError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req.headers()))
    }
}
