use thiserror::Error;

/// Why a credential was refused.
///
/// Only ever logged. Every variant becomes the same opaque 401 at the
/// boundary so callers cannot probe which validation step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("bad signature")]
    BadSignature,
    #[error("wrong algorithm")]
    WrongAlgorithm,
    #[error("expired")]
    Expired,
    #[error("missing subject claim")]
    MissingSubject,
}

impl AuthRejection {
    /// Stable snake_case label for log fields.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::BadSignature => "bad_signature",
            Self::WrongAlgorithm => "wrong_algorithm",
            Self::Expired => "expired",
            Self::MissingSubject => "missing_subject_claim",
        }
    }
}
