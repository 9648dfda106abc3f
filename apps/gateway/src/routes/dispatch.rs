//! Catch-all handler: route, authenticate, forward.
//!
//! The order is fixed. An unknown path is a 404 before any credential is
//! looked at, and a protected route never reaches its backend without a
//! verified identity.

use std::time::SystemTime;

use actix_web::http::header;
use actix_web::web::{self, Bytes, BytesMut};
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use futures_util::StreamExt as _;
use uuid::Uuid;

use crate::auth::{extract_bearer, AuthRejection, TokenVerifier};
use crate::logging::security;
use crate::middleware::RequestId;
use crate::proxy::{ForwardContext, TrustedIdentityHeaders};
use crate::routing::MatchedRoute;
use crate::state::AppState;
use crate::AppError;

pub async fn dispatch(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let route = state
        .routes
        .resolve(req.path())
        .ok_or_else(|| AppError::no_route(req.path()))?;
    req.extensions_mut()
        .insert(MatchedRoute(route.prefix().to_string()));

    let identity = if route.requires_auth() {
        match authenticate(&req, &state.verifier) {
            Ok(identity) => Some(identity),
            Err(reason) => {
                security::auth_rejected(reason, route.prefix(), req.path());
                return Err(reason.into());
            }
        }
    } else {
        None
    };

    let body = read_body(&req, payload, state.max_body_bytes).await?;

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let ctx = ForwardContext::begin(route, &req, request_id, state.forwarder.timeout());

    state
        .forwarder
        .forward(&ctx, &req, body, identity.as_ref())
        .await
}

fn authenticate(
    req: &HttpRequest,
    verifier: &TokenVerifier,
) -> Result<TrustedIdentityHeaders, AuthRejection> {
    let token = extract_bearer(req.headers().get(header::AUTHORIZATION))?;
    let claims = verifier.verify(token, SystemTime::now())?;
    TrustedIdentityHeaders::from_claims(&claims)
}

/// Read the whole inbound body, refusing anything above `limit` bytes.
async fn read_body(
    req: &HttpRequest,
    mut payload: web::Payload,
    limit: usize,
) -> Result<Bytes, AppError> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(AppError::PayloadTooLarge { limit });
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest {
            detail: e.to_string(),
        })?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
