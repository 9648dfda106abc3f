use jsonwebtoken::Algorithm;

/// Shared-secret token settings.
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC secret shared with the authentication backend
    pub jwt_secret: Vec<u8>,
    /// The only algorithm accepted on inbound tokens (HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

// Keep the secret out of logs and panic messages.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
