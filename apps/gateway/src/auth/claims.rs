//! Identity claims and their coercion from the token payload.

use serde::Deserialize;
use serde_json::Value;

use super::AuthRejection;

/// Largest integer an IEEE-754 double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Verified identity facts for a single request.
///
/// Only produced by [`super::TokenVerifier::verify`]; there is no public
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    subject: i64,
    email: String,
    expires_at: i64,
}

impl IdentityClaims {
    pub fn subject(&self) -> i64 {
        self.subject
    }

    /// Empty when the token carried no email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Expiry in seconds since the epoch.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

/// Token payload as decoded, before any field is trusted.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<Value>,
}

impl RawClaims {
    pub(crate) fn validate(self, now_secs: i64) -> Result<IdentityClaims, AuthRejection> {
        let exp = match self.exp {
            None | Some(Value::Null) => return Err(AuthRejection::MalformedCredential),
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .ok_or(AuthRejection::MalformedCredential)?,
            Some(_) => return Err(AuthRejection::MalformedCredential),
        };
        if exp <= now_secs as f64 {
            return Err(AuthRejection::Expired);
        }

        let subject = match self.sub {
            None | Some(Value::Null) => return Err(AuthRejection::MissingSubject),
            Some(value) => coerce_subject(&value).ok_or(AuthRejection::MalformedCredential)?,
        };

        let email = self.email.unwrap_or_default();
        // Becomes a header value downstream.
        if email.chars().any(char::is_control) {
            return Err(AuthRejection::MalformedCredential);
        }

        Ok(IdentityClaims {
            subject,
            email,
            expires_at: exp as i64,
        })
    }
}

/// Integer-safe subject coercion.
///
/// Integers are taken exactly. Float-shaped numbers are accepted only when
/// integral and within the exactly-representable range, and decimal strings
/// are parsed as `i64`. Everything else is rejected.
pub(crate) fn coerce_subject(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            if n.is_u64() {
                return None;
            }
            let f = n.as_f64()?;
            (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then_some(f as i64)
        }),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}
