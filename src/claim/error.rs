use axum::http::StatusCode;
use thiserror::Error;

/// Signing secret problems. Fatal: nothing can be issued or validated without a usable key.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Signing secret is too short: expected at least {min} bytes, got {len}")]
    WeakSecret { len: usize, min: usize },
}

/// Issuer errors with API error codes
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl ClaimError {
    /// Convert error to HTTP status code
    pub fn to_err_code(&self) -> StatusCode {
        match self {
            ClaimError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ClaimError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Why a token was refused. Only meant for logs: callers see a single rejection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RejectReason {
    Malformed,
    BadSignature,
    UnsupportedAlgorithm,
    Expired,
    NotYetValid,
    InvalidClaims,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Malformed => "malformed",
            RejectReason::BadSignature => "bad_signature",
            RejectReason::UnsupportedAlgorithm => "unsupported_algorithm",
            RejectReason::Expired => "expired",
            RejectReason::NotYetValid => "not_yet_valid",
            RejectReason::InvalidClaims => "invalid_claims",
        }
    }
}

/// The single outcome of a failed validation.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[error("invalid token")]
pub struct Rejection {
    reason: RejectReason,
}

impl Rejection {
    pub(crate) fn new(reason: RejectReason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> RejectReason {
        self.reason
    }

    pub fn is_expired(&self) -> bool {
        self.reason == RejectReason::Expired
    }

    pub fn to_err_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<&jsonwebtoken::errors::Error> for RejectReason {
    fn from(error: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::InvalidSignature => RejectReason::BadSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => RejectReason::UnsupportedAlgorithm,
            ErrorKind::ExpiredSignature => RejectReason::Expired,
            ErrorKind::ImmatureSignature => RejectReason::NotYetValid,
            ErrorKind::MissingRequiredClaim(_) | ErrorKind::InvalidSubject => {
                RejectReason::InvalidClaims
            }
            _ => RejectReason::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_hides_reason_in_display() {
        let expired = Rejection::new(RejectReason::Expired);
        let forged = Rejection::new(RejectReason::BadSignature);

        assert_eq!(expired.to_string(), forged.to_string());
        assert_eq!(expired.to_err_code(), StatusCode::UNAUTHORIZED);
        assert!(expired.is_expired());
        assert!(!forged.is_expired());
        assert_eq!(forged.reason().as_str(), "bad_signature");
    }

    #[test]
    fn test_claim_error_status_codes() {
        assert_eq!(
            ClaimError::InvalidInput("video_id is required").to_err_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ClaimError::from(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
            ))
            .to_err_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
