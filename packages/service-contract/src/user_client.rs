//! Client for the user service's internal lookup endpoint.
//!
//! `GET <base>/internal/users/{id}` answers `200` with a [`User`] or `404`.
//! The caller's correlation id is forwarded so a lookup shows up under the
//! same request id as the call that triggered it.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::REQUEST_ID_HEADER;

/// Total budget for a single lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("user {0} not found")]
    NotFound(i64),
    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: Url,
    http: reqwest::Client,
}

impl UserClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn user_url(&self, id: i64) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/internal/users/{id}"));
        url.set_query(None);
        url
    }

    pub async fn get_user_by_id(
        &self,
        id: i64,
        request_id: Option<&str>,
    ) -> Result<User, ClientError> {
        let mut request = self.http.get(self.user_url(id));
        if let Some(request_id) = request_id.filter(|v| !v.is_empty()) {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(user_id = id, status = status.as_u16(), "user lookup");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id));
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status));
        }

        Ok(response.json::<User>().await?)
    }
}
