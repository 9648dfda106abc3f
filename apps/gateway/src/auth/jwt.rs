use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::claims::RawClaims;
use super::{AuthRejection, IdentityClaims};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims as issued by the authentication backend.
#[derive(Debug, Serialize, Clone)]
pub struct IssuedClaims {
    /// Numeric user identifier
    pub sub: i64,
    pub email: String,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an access token in the authentication backend's format.
pub fn mint_access_token(
    subject: i64,
    email: &str,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let issued_at = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = IssuedClaims {
        sub: subject,
        email: email.to_string(),
        exp: issued_at + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Verifies bearer tokens against the shared secret.
///
/// Built once at startup; holds no per-request state.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
}

impl TokenVerifier {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(security.algorithm);
        // Presence and expiry of `sub`/`exp` are checked on the narrow claims
        // type so that expiry is strict (no leeway, `exp == now` is expired).
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(&security.jwt_secret),
            validation,
            algorithm: security.algorithm,
        }
    }

    pub fn verify(&self, token: &str, now: SystemTime) -> Result<IdentityClaims, AuthRejection> {
        self.check_declared_algorithm(token)?;

        let data = decode::<RawClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthRejection::BadSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    AuthRejection::WrongAlgorithm
                }
                ErrorKind::ExpiredSignature => AuthRejection::Expired,
                _ => AuthRejection::MalformedCredential,
            }
        })?;

        let now_secs = now
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthRejection::Expired)?
            .as_secs() as i64;

        data.claims.validate(now_secs)
    }

    /// Refuse anything not declaring the configured algorithm (including
    /// `none`) before any signature work happens.
    fn check_declared_algorithm(&self, token: &str) -> Result<(), AuthRejection> {
        let mut segments = token.split('.');
        let (Some(header), Some(_), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthRejection::MalformedCredential);
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| AuthRejection::MalformedCredential)?;
        let declared: DeclaredHeader =
            serde_json::from_slice(&bytes).map_err(|_| AuthRejection::MalformedCredential)?;

        match declared.alg.parse::<Algorithm>() {
            Ok(alg) if alg == self.algorithm => Ok(()),
            _ => Err(AuthRejection::WrongAlgorithm),
        }
    }
}
