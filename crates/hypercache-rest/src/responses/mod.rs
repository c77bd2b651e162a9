//! API response types.

use hypercache_core::{ErrorResponse, HyperCacheError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

/// Application error type for Axum.
///
/// Renders as the error's HTTP status with an [`ErrorResponse`] body that
/// carries only the public message.
#[derive(Debug)]
pub struct AppError(pub HyperCacheError);

impl From<HyperCacheError> for AppError {
    fn from(err: HyperCacheError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_upstream_failure() {
            warn!("Upstream failure: {}", self.0);
        } else {
            debug!("Request failed with {}: {}", status, self.0);
        }

        let body = Json(ErrorResponse::from_error(&self.0));
        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<T, AppError>;

/// Helper to create an empty 200 response.
pub fn ok_empty() -> StatusCode {
    StatusCode::OK
}
