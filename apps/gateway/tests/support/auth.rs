//! Token helpers for tests

use std::time::{Duration, SystemTime};

use gateway::auth::mint_access_token;
use gateway::state::SecurityConfig;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Mint a valid token for the given subject and email
pub fn mint_test_token(sub: i64, email: &str, sec: &SecurityConfig) -> String {
    mint_access_token(sub, email, SystemTime::now(), TOKEN_TTL, sec)
        .expect("should mint token successfully")
}

/// Full Authorization header value including the "Bearer " prefix
pub fn bearer_header(sub: i64, email: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, email, sec))
}

/// Token whose expiry passed one second ago
pub fn mint_expired_token(sub: i64, email: &str, sec: &SecurityConfig) -> String {
    let ttl = Duration::from_secs(60);
    let issued = SystemTime::now() - ttl - Duration::from_secs(1);
    mint_access_token(sub, email, issued, ttl, sec).expect("should mint expired token")
}

/// Correctly shaped token signed with a different HMAC algorithm
pub fn mint_hs512_token(sub: i64, secret: &str) -> String {
    let exp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs()
        + TOKEN_TTL.as_secs();
    encode(
        &Header::new(Algorithm::HS512),
        &json!({"sub": sub, "email": "a@b.c", "exp": exp}),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("should encode HS512 token")
}
