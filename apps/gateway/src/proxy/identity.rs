//! Gateway-owned identity headers.
//!
//! Values come only from verified claims. Any inbound copies of these
//! headers are removed before forwarding, on every route.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use service_contract::{USER_EMAIL_HEADER, USER_ID_HEADER};

use crate::auth::{AuthRejection, IdentityClaims};

#[derive(Debug, Clone)]
pub struct TrustedIdentityHeaders {
    user_id: HeaderValue,
    email: HeaderValue,
}

impl TrustedIdentityHeaders {
    pub fn from_claims(claims: &IdentityClaims) -> Result<Self, AuthRejection> {
        let user_id = HeaderValue::from(claims.subject());
        let email = HeaderValue::from_bytes(claims.email().as_bytes())
            .map_err(|_| AuthRejection::MalformedCredential)?;
        Ok(Self { user_id, email })
    }

    pub fn user_id(&self) -> &HeaderValue {
        &self.user_id
    }

    pub fn email(&self) -> &HeaderValue {
        &self.email
    }

    /// Replaces any existing values. Must be the final write to `headers`.
    pub fn attach(&self, headers: &mut HeaderMap) {
        headers.insert(HeaderName::from_static(USER_ID_HEADER), self.user_id.clone());
        headers.insert(HeaderName::from_static(USER_EMAIL_HEADER), self.email.clone());
    }
}
