//! gRPC health service implementation.

use crate::proto::health::{
    health_check_response::ServingStatus, health_server::Health, HealthCheckRequest,
    HealthCheckResponse,
};
use crate::proto::CACHE_SERVICE_NAME;
use hypercache_service::CacheService;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::debug;

/// Health service reporting whether the cache service can reach its store.
pub struct HealthServiceImpl {
    cache_service: Arc<dyn CacheService>,
}

impl HealthServiceImpl {
    /// Creates a new health service.
    pub fn new(cache_service: Arc<dyn CacheService>) -> Self {
        Self { cache_service }
    }

    /// Gets the health status for a service.
    async fn get_status(&self, service: &str) -> ServingStatus {
        debug!("Health check for service: '{}'", service);

        match service {
            "" | CACHE_SERVICE_NAME => match self.cache_service.ping().await {
                Ok(()) => ServingStatus::Serving,
                Err(_) => ServingStatus::NotServing,
            },
            _ => ServingStatus::ServiceUnknown,
        }
    }
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service).await;

        Ok(Response::new(HealthCheckResponse {
            status: status.into(),
        }))
    }

    type WatchStream = ReceiverStream<Result<HealthCheckResponse, Status>>;

    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service).await;

        let (tx, rx) = tokio::sync::mpsc::channel(1);

        // Only the current status is sent; the stream then ends.
        let _ = tx
            .send(Ok(HealthCheckResponse {
                status: status.into(),
            }))
            .await;

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
