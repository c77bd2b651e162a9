//! Main application router.

use crate::{
    controllers::{cache_controller, health_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hypercache_config::ServerConfig;
use hypercache_core::UserScopedKey;
use hypercache_service::CacheService;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;

/// Creates the main application router over a cache service.
pub fn create_router(cache_service: Arc<dyn CacheService>, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);
    let state = AppState::new(cache_service);

    let router = Router::new()
        .merge(health_controller::router())
        .merge(cache_controller::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/", get(root))
        .fallback(fallback)
        .with_state(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with cache endpoints and OpenAPI at /api-docs/openapi.json");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "HyperCache API"
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Unmatched routes.
///
/// Paths under `/cache/` that did not match are missing a user id or key
/// segment (`/cache//key1`) and are answered with 400 rather than 404.
async fn fallback(method: Method, uri: Uri) -> Response {
    let is_cache_path = uri.path().starts_with("/cache/");
    if is_cache_path && (method == Method::GET || method == Method::DELETE) {
        let segments: Vec<&str> = uri.path()["/cache/".len()..].split('/').collect();
        let (user_id, key) = match segments.as_slice() {
            [user_id, key] => (*user_id, *key),
            [user_id] => (*user_id, ""),
            _ => ("", ""),
        };
        if let Err(err) = cache_controller::require_key(&UserScopedKey::new(user_id, key)) {
            return err.into_response();
        }
    }

    StatusCode::NOT_FOUND.into_response()
}
