//! Unified error types for all layers of the gateway.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for HyperCache.
///
/// The variant chosen in the service layer is preserved across the gRPC hop
/// and decides the HTTP status.
#[derive(Error, Debug)]
pub enum HyperCacheError {
    /// Key absent where absence has to be reported as an error.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, empty, or malformed request field.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport or backend failure talking to the store (or to the
    /// internal service that fronts it).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure, e.g. a malformed reply from the store.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HyperCacheError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidArgument(_) => 400,
            Self::StoreUnavailable(_) => 502,
            Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the reason that may be shown to an external caller.
    ///
    /// Store and internal failures carry addresses and driver messages in
    /// their detail string; those stay in the logs. Only argument errors echo
    /// their detail, since it describes the caller's own input.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) => msg.clone(),
            Self::NotFound(_) => "key not found".to_string(),
            Self::StoreUnavailable(_) => "cache store unavailable".to_string(),
            Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => {
                "internal error".to_string()
            }
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a store unavailable error.
    #[must_use]
    pub fn store_unavailable<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is caused by an external dependency.
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Short human-readable reason
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `HyperCacheError`.
    #[must_use]
    pub fn from_error(error: &HyperCacheError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.public_message(),
        }
    }
}

impl From<&HyperCacheError> for ErrorResponse {
    fn from(error: &HyperCacheError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(HyperCacheError::not_found("k").status_code(), 404);
        assert_eq!(HyperCacheError::invalid_argument("empty key").status_code(), 400);
        assert_eq!(HyperCacheError::store_unavailable("refused").status_code(), 502);
        assert_eq!(HyperCacheError::internal("oops").status_code(), 500);
        assert_eq!(HyperCacheError::Configuration("bad".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HyperCacheError::not_found("k").error_code(), "NOT_FOUND");
        assert_eq!(HyperCacheError::invalid_argument("x").error_code(), "INVALID_ARGUMENT");
        assert_eq!(HyperCacheError::store_unavailable("x").error_code(), "STORE_UNAVAILABLE");
        assert_eq!(HyperCacheError::internal("x").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            HyperCacheError::Other(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_public_message_hides_store_details() {
        let err = HyperCacheError::store_unavailable("connection refused (redis://10.0.0.5:6379)");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "STORE_UNAVAILABLE");
        assert!(!response.message.contains("10.0.0.5"));
        assert!(!response.message.contains("redis://"));
    }

    #[test]
    fn test_public_message_keeps_argument_reason() {
        let err = HyperCacheError::invalid_argument("userId must not be empty");
        assert_eq!(err.public_message(), "userId must not be empty");
    }

    #[test]
    fn test_upstream_failure() {
        assert!(HyperCacheError::store_unavailable("down").is_upstream_failure());
        assert!(!HyperCacheError::internal("bug").is_upstream_failure());
        assert!(!HyperCacheError::not_found("k").is_upstream_failure());
    }

    #[test]
    fn test_error_response_from_ref() {
        let err = HyperCacheError::not_found("user1/key1");
        let response: ErrorResponse = ErrorResponse::from(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "key not found");
    }
}
