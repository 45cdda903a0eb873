//! Unified error handling for the client core.
//!
//! Provides a unified `AppError` type so embedding frontends deal with
//! one error surface. Server-provided messages are carried through
//! unaltered; session expiry stays a distinguished case so callers can
//! trigger re-authentication instead of a generic failure path.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::ValidationError;
use crate::config::ConfigError;

/// Application-level error type for the client core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request to the BuyLog service failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A staged receipt failed validation before any network call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Whether this error means the session is no longer valid.
    ///
    /// Callers must not retry after this; the auth collaborator owns
    /// the re-login flow.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(ApiError::SessionExpired))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_is_distinguished() {
        let err = AppError::from(ApiError::SessionExpired);
        assert!(err.is_session_expired());

        let err = AppError::from(ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(!err.is_session_expired());
    }

    #[test]
    fn test_display_carries_server_message() {
        let err = AppError::from(ApiError::Api {
            status: 409,
            message: "user already invited".to_string(),
        });
        assert!(err.to_string().contains("user already invited"));
    }
}
