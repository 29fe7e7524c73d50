//! Error taxonomy for the credential flows.

use crate::store::StoreError;
use thiserror::Error;

/// Every failure a credential operation can surface. Verification failures
/// are always reported, never swallowed; no variant doubles as control flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was missing, empty, or malformed.
    #[error("{0}")]
    Validation(&'static str),

    #[error("email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password. One variant for both, so callers
    /// cannot probe which emails are registered.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Wrong or expired code. The underlying secret stays valid.
    #[error("invalid one-time code")]
    InvalidOtp,

    #[error("too many attempts, try again later")]
    RateLimited,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable kind, reported as the wire `error` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::DuplicateEmail => "DuplicateEmail",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::InvalidOtp => "InvalidOtp",
            Self::RateLimited => "RateLimited",
            Self::StorageUnavailable(_) => "StorageUnavailable",
            Self::Internal(_) => "Internal",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Unavailable(msg) => Self::StorageUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(AuthError::Validation("name").kind(), "ValidationError");
        assert_eq!(AuthError::DuplicateEmail.kind(), "DuplicateEmail");
        assert_eq!(AuthError::InvalidCredentials.kind(), "InvalidCredentials");
        assert_eq!(AuthError::InvalidOtp.kind(), "InvalidOtp");
        assert_eq!(AuthError::RateLimited.kind(), "RateLimited");
        assert_eq!(
            AuthError::StorageUnavailable("down".to_string()).kind(),
            "StorageUnavailable"
        );
        assert_eq!(AuthError::Internal("boom".to_string()).kind(), "Internal");
    }

    #[test]
    fn test_store_errors_map_onto_auth_errors() {
        assert!(matches!(
            AuthError::from(StoreError::DuplicateEmail),
            AuthError::DuplicateEmail
        ));
        assert!(matches!(
            AuthError::from(StoreError::Unavailable("down".to_string())),
            AuthError::StorageUnavailable(_)
        ));
    }

    #[test]
    fn test_invalid_credentials_message_names_neither_cause() {
        let message = AuthError::InvalidCredentials.to_string();

        assert!(!message.contains("unknown"));
        assert!(!message.contains("not found"));
    }
}
