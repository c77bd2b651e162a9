//! OpenAPI documentation for the public HTTP surface.

use crate::controllers::cache_controller::{SetCacheRequest, ValueEncoding};
use crate::controllers::HealthResponse;
use hypercache_core::ErrorResponse;
use utoipa::OpenApi;

/// OpenAPI documentation for the HyperCache API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HyperCache API",
        version = "1.0.0",
        description = "Per-user key-value cache over HTTP",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Cache endpoints
        crate::controllers::cache_controller::get_cache,
        crate::controllers::cache_controller::set_cache,
        crate::controllers::cache_controller::delete_cache,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            SetCacheRequest,
            ValueEncoding,
            HealthResponse,
        )
    ),
    tags(
        (name = "cache", description = "Cache endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
