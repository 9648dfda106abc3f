use std::error::Error as _;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse};
use reqwest::header::HeaderMap;
use reqwest::{redirect, Client, Method};
use tracing::{debug, warn};

use super::headers::{outbound_headers, relayed_response_headers};
use super::{ForwardContext, TrustedIdentityHeaders, UpstreamError};
use crate::AppError;

/// Relays requests to backends over one shared connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    timeout: Duration,
}

struct UpstreamReply {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        // Redirects are relayed to the caller, never followed.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Ceiling for one backend exchange, from send to last body byte.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward `req` with an already-read `body` and relay the reply.
    ///
    /// The backend's status, headers and body come back as received. Any
    /// status is a success here; only transport failures are errors.
    pub async fn forward(
        &self,
        ctx: &ForwardContext,
        req: &HttpRequest,
        body: Bytes,
        identity: Option<&TrustedIdentityHeaders>,
    ) -> Result<HttpResponse, AppError> {
        let method = Method::from_bytes(req.method().as_str().as_bytes()).map_err(|_| {
            AppError::BadRequest {
                detail: format!("Unsupported method {}", req.method()),
            }
        })?;

        let peer_ip = req.peer_addr().map(|addr| addr.ip().to_string());
        let mut headers = outbound_headers(req.headers(), peer_ip.as_deref(), &ctx.request_id);
        if let Some(identity) = identity {
            identity.attach(&mut headers);
        }

        let reply = match self.exchange(ctx, method, headers, body).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    trace_id = %ctx.request_id,
                    route = %ctx.prefix,
                    upstream_host = ctx.target.host_str().unwrap_or_default(),
                    upstream_path = ctx.target.path(),
                    error = %err,
                    "Upstream exchange failed"
                );
                return Err(err.into());
            }
        };

        let status = StatusCode::from_u16(reply.status).map_err(|_| {
            UpstreamError::MalformedResponse(format!("invalid status {}", reply.status))
        })?;

        debug!(
            trace_id = %ctx.request_id,
            route = %ctx.prefix,
            status = reply.status,
            bytes = reply.body.len(),
            "Upstream responded"
        );

        let mut response = HttpResponse::build(status).body(reply.body);
        *response.headers_mut() = relayed_response_headers(&reply.headers);
        Ok(response)
    }

    /// Whole exchange under the context deadline. The body is read in full
    /// so a response is either complete or replaced by an error.
    async fn exchange(
        &self,
        ctx: &ForwardContext,
        method: Method,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamReply, UpstreamError> {
        let call = async {
            let resp = self
                .client
                .request(method, ctx.target.clone())
                .headers(headers)
                .body(body)
                .send()
                .await
                .map_err(classify)?;

            let status = resp.status().as_u16();
            let headers = resp.headers().clone();
            let body = resp
                .bytes()
                .await
                .map_err(|e| UpstreamError::MalformedResponse(describe(&e)))?;

            Ok::<_, UpstreamError>(UpstreamReply {
                status,
                headers,
                body,
            })
        };

        tokio::time::timeout_at(ctx.deadline, call)
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))?
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_connect() {
        UpstreamError::Unreachable(describe(&err))
    } else {
        UpstreamError::MalformedResponse(describe(&err))
    }
}

/// `reqwest` puts the useful part (refused, reset, parse error) in the
/// source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
