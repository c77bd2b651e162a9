//! Cache gRPC service implementation.

use crate::proto::cache;
use hypercache_core::{HyperCacheError, MAX_EXPIRATION_SECONDS};
use hypercache_service::{CacheService, DeleteRequest, GetRequest, SetRequest};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, error};

/// Cache gRPC service implementation.
pub struct CacheGrpcService {
    cache_service: Arc<dyn CacheService>,
}

impl CacheGrpcService {
    /// Creates a new cache gRPC service.
    pub fn new(cache_service: Arc<dyn CacheService>) -> Self {
        Self { cache_service }
    }
}

#[tonic::async_trait]
impl cache::cache_service_server::CacheService for CacheGrpcService {
    async fn get(
        &self,
        request: Request<cache::GetRequest>,
    ) -> Result<Response<cache::GetResponse>, Status> {
        let req = request.into_inner();
        debug!("gRPC Get: {}/{}", req.user_id, req.key);

        let response = self
            .cache_service
            .get(GetRequest::new(req.user_id, req.key))
            .await
            .map_err(to_status)?;

        Ok(Response::new(cache::GetResponse {
            found: response.value.is_some(),
            value: response.value.unwrap_or_default(),
        }))
    }

    async fn set(
        &self,
        request: Request<cache::SetRequest>,
    ) -> Result<Response<cache::SetResponse>, Status> {
        let req = request.into_inner();
        debug!("gRPC Set: {}/{}", req.user_id, req.key);

        let expiration_seconds = u64::try_from(req.expiration_seconds).map_err(|_| {
            Status::invalid_argument("expiration_seconds must not be negative")
        })?;
        if expiration_seconds > MAX_EXPIRATION_SECONDS {
            return Err(Status::invalid_argument(format!(
                "expiration_seconds must not exceed {}",
                MAX_EXPIRATION_SECONDS
            )));
        }

        let response = self
            .cache_service
            .set(SetRequest::new(req.user_id, req.key, req.value, expiration_seconds))
            .await
            .map_err(to_status)?;

        Ok(Response::new(cache::SetResponse {
            success: response.success,
        }))
    }

    async fn delete(
        &self,
        request: Request<cache::DeleteRequest>,
    ) -> Result<Response<cache::DeleteResponse>, Status> {
        let req = request.into_inner();
        debug!("gRPC Delete: {}/{}", req.user_id, req.key);

        let response = self
            .cache_service
            .delete(DeleteRequest::new(req.user_id, req.key))
            .await
            .map_err(to_status)?;

        Ok(Response::new(cache::DeleteResponse {
            success: response.success,
        }))
    }
}

/// Converts a service error into a gRPC status.
///
/// The status message is the public reason only; the detail is logged here.
pub fn to_status(err: HyperCacheError) -> Status {
    error!("gRPC error: {:?}", err);

    let message = err.public_message();
    match err {
        HyperCacheError::InvalidArgument(_) => Status::invalid_argument(message),
        HyperCacheError::NotFound(_) => Status::not_found(message),
        HyperCacheError::StoreUnavailable(_) => Status::unavailable(message),
        _ => Status::internal(message),
    }
}
