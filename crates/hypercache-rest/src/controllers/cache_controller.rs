//! Cache controller.
//!
//! Translates the public HTTP surface into cache service calls:
//!
//! - `GET /cache/{userId}/{key}` returns the raw value bytes
//! - `POST /cache` stores a value from a JSON body
//! - `DELETE /cache/{userId}/{key}` removes a value

use crate::{
    extractors::ValidatedJson,
    responses::{ok_empty, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hypercache_core::{HyperCacheError, UserScopedKey, MAX_EXPIRATION_SECONDS};
use hypercache_service::{DeleteRequest, GetRequest, SetRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

/// How the `value` of a [`SetCacheRequest`] is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValueEncoding {
    /// The value is stored as the UTF-8 bytes of the string.
    #[default]
    Utf8,
    /// The value is standard base64 and is stored decoded.
    Base64,
}

/// Body of `POST /cache`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCacheRequest {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "key must not be empty"))]
    pub key: String,
    pub value: String,
    /// Seconds until the entry expires; 0 or absent keeps it until deleted.
    /// At most ten years.
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = 315_360_000,
        message = "expirationSeconds must be between 0 and 315360000"
    ))]
    pub expiration_seconds: i64,
    #[serde(default)]
    pub encoding: ValueEncoding,
}

impl SetCacheRequest {
    /// Returns the value bytes according to `encoding`.
    pub fn value_bytes(&self) -> Result<Vec<u8>, HyperCacheError> {
        match self.encoding {
            ValueEncoding::Utf8 => Ok(self.value.as_bytes().to_vec()),
            ValueEncoding::Base64 => STANDARD
                .decode(&self.value)
                .map_err(|e| HyperCacheError::invalid_argument(format!("value is not valid base64: {}", e))),
        }
    }
}

/// Creates the cache router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cache", post(set_cache))
        .route("/cache/:user_id/:key", get(get_cache).delete(delete_cache))
}

/// Rejects an empty user id or key before any service call.
pub(crate) fn require_key(key: &UserScopedKey) -> Result<(), AppError> {
    if key.has_empty_component() {
        return Err(AppError(HyperCacheError::invalid_argument(
            "userId and key must not be empty",
        )));
    }
    Ok(())
}

/// Get a cached value.
#[utoipa::path(
    get,
    path = "/cache/{user_id}/{key}",
    tag = "cache",
    params(
        ("user_id" = String, Path, description = "Owner of the entry"),
        ("key" = String, Path, description = "Key within the user's namespace")
    ),
    responses(
        (status = 200, description = "Raw value bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 400, description = "Empty userId or key", body = hypercache_core::ErrorResponse),
        (status = 404, description = "Key not found"),
        (status = 502, description = "Cache store unavailable", body = hypercache_core::ErrorResponse)
    )
)]
pub async fn get_cache(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(String, String)>,
) -> ApiResult<Response> {
    debug!("Get cache request: {}/{}", user_id, key);

    let request = GetRequest::new(user_id, key);
    require_key(&request.key)?;

    let response = state.cache_service.get(request).await?;

    Ok(match response.value {
        Some(value) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            value,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Store a value.
#[utoipa::path(
    post,
    path = "/cache",
    tag = "cache",
    request_body = SetCacheRequest,
    responses(
        (status = 200, description = "Value stored"),
        (status = 400, description = "Malformed or invalid request", body = hypercache_core::ErrorResponse),
        (status = 502, description = "Cache store unavailable", body = hypercache_core::ErrorResponse)
    )
)]
pub async fn set_cache(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SetCacheRequest>,
) -> ApiResult<StatusCode> {
    debug!("Set cache request: {}/{}", request.user_id, request.key);

    let value = request.value_bytes()?;
    let expiration_seconds = u64::try_from(request.expiration_seconds)
        .ok()
        .filter(|seconds| *seconds <= MAX_EXPIRATION_SECONDS)
        .ok_or_else(|| {
            HyperCacheError::invalid_argument("expirationSeconds is out of range")
        })?;

    state
        .cache_service
        .set(SetRequest::new(
            request.user_id,
            request.key,
            value,
            expiration_seconds,
        ))
        .await?;

    Ok(ok_empty())
}

/// Delete a cached value. Deleting an absent key succeeds.
#[utoipa::path(
    delete,
    path = "/cache/{user_id}/{key}",
    tag = "cache",
    params(
        ("user_id" = String, Path, description = "Owner of the entry"),
        ("key" = String, Path, description = "Key within the user's namespace")
    ),
    responses(
        (status = 200, description = "Value removed"),
        (status = 400, description = "Empty userId or key", body = hypercache_core::ErrorResponse),
        (status = 502, description = "Cache store unavailable", body = hypercache_core::ErrorResponse)
    )
)]
pub async fn delete_cache(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    debug!("Delete cache request: {}/{}", user_id, key);

    let request = DeleteRequest::new(user_id, key);
    require_key(&request.key)?;

    state.cache_service.delete(request).await?;

    Ok(ok_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str, encoding: ValueEncoding) -> SetCacheRequest {
        SetCacheRequest {
            user_id: "user1".to_string(),
            key: "key1".to_string(),
            value: value.to_string(),
            expiration_seconds: 0,
            encoding,
        }
    }

    #[test]
    fn test_utf8_value_bytes() {
        let req = request("value1", ValueEncoding::Utf8);
        assert_eq!(req.value_bytes().unwrap(), b"value1");
    }

    #[test]
    fn test_base64_value_bytes() {
        let req = request("AAH/", ValueEncoding::Base64);
        assert_eq!(req.value_bytes().unwrap(), vec![0x00, 0x01, 0xff]);
    }

    #[test]
    fn test_bad_base64_is_invalid_argument() {
        let req = request("not base64!", ValueEncoding::Base64);
        assert!(matches!(
            req.value_bytes(),
            Err(HyperCacheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_request_defaults() {
        let req: SetCacheRequest =
            serde_json::from_str(r#"{"userId":"u","key":"k","value":"v"}"#).unwrap();
        assert_eq!(req.expiration_seconds, 0);
        assert_eq!(req.encoding, ValueEncoding::Utf8);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_key_fails_validation() {
        let req: SetCacheRequest =
            serde_json::from_str(r#"{"userId":"u","key":"","value":"v"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_expiration_bound_matches_limit() {
        let max = i64::try_from(MAX_EXPIRATION_SECONDS).unwrap();

        let mut req = request("v", ValueEncoding::Utf8);
        req.expiration_seconds = max;
        assert!(req.validate().is_ok());

        req.expiration_seconds = max + 1;
        assert!(req.validate().is_err());

        req.expiration_seconds = i64::MAX;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_require_key() {
        assert!(require_key(&UserScopedKey::new("u", "k")).is_ok());
        assert!(require_key(&UserScopedKey::new("", "k")).is_err());
        assert!(require_key(&UserScopedKey::new("u", "")).is_err());
    }
}
