//! Remote cache service client via gRPC.

use crate::proto::health::{
    health_check_response::ServingStatus, health_client::HealthClient, HealthCheckRequest,
};
use crate::proto::{cache, CACHE_SERVICE_NAME};
use async_trait::async_trait;
use hypercache_core::{HyperCacheError, HyperCacheResult};
use hypercache_service::dto::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, SetRequest, SetResponse,
};
use hypercache_service::CacheService;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};

/// Remote cache service client that communicates via gRPC.
///
/// Each call is a single RPC. Dropping the returned future cancels the RPC.
#[derive(Clone)]
pub struct RemoteCacheServiceClient {
    client: cache::cache_service_client::CacheServiceClient<Channel>,
    health: HealthClient<Channel>,
}

impl RemoteCacheServiceClient {
    /// Connects to the cache service, failing if it cannot be reached.
    pub async fn connect(addr: &str) -> HyperCacheResult<Self> {
        let channel = endpoint(addr)?.connect().await.map_err(|e| {
            HyperCacheError::StoreUnavailable(format!("Failed to connect to cache service: {}", e))
        })?;

        Ok(Self::from_channel(channel))
    }

    /// Creates a client whose connection is established on first use.
    pub fn connect_lazy(addr: &str) -> HyperCacheResult<Self> {
        Ok(Self::from_channel(endpoint(addr)?.connect_lazy()))
    }

    /// Creates from an existing channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: cache::cache_service_client::CacheServiceClient::new(channel.clone()),
            health: HealthClient::new(channel),
        }
    }

    /// Sets the largest cache message the client will encode or decode.
    ///
    /// Must match the server's limit for values near the limit to round-trip.
    #[must_use]
    pub fn with_max_message_size(mut self, limit: usize) -> Self {
        self.client = self
            .client
            .max_decoding_message_size(limit)
            .max_encoding_message_size(limit);
        self
    }

    /// Polls the remote health service until it reports the cache service as serving.
    pub async fn wait_until_serving(
        &self,
        max_attempts: u32,
        interval: Duration,
    ) -> HyperCacheResult<()> {
        let mut attempt = 1;
        loop {
            match self.ping().await {
                Ok(()) => {
                    info!("Cache service is serving");
                    return Ok(());
                }
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    debug!(
                        "Cache service not ready (attempt {}/{}): {}",
                        attempt, max_attempts, e
                    );
                }
            }
            attempt += 1;
            tokio::time::sleep(interval).await;
        }
    }
}

fn endpoint(addr: &str) -> HyperCacheResult<Endpoint> {
    Endpoint::from_shared(addr.to_string()).map_err(|e| {
        HyperCacheError::Configuration(format!("Invalid cache service address '{}': {}", addr, e))
    })
}

#[async_trait]
impl CacheService for RemoteCacheServiceClient {
    async fn get(&self, request: GetRequest) -> HyperCacheResult<GetResponse> {
        debug!("Remote Get: {}", request.key);

        let response = self
            .client
            .clone()
            .get(cache::GetRequest {
                user_id: request.key.user_id,
                key: request.key.key,
            })
            .await
            .map_err(map_grpc_error)?
            .into_inner();

        Ok(GetResponse {
            value: response.found.then_some(response.value),
        })
    }

    async fn set(&self, request: SetRequest) -> HyperCacheResult<SetResponse> {
        debug!("Remote Set: {}", request.key);

        let expiration_seconds = i64::try_from(request.expiration_seconds).map_err(|_| {
            HyperCacheError::invalid_argument("expiration_seconds is out of range")
        })?;

        let response = self
            .client
            .clone()
            .set(cache::SetRequest {
                user_id: request.key.user_id,
                key: request.key.key,
                value: request.value,
                expiration_seconds,
            })
            .await
            .map_err(map_grpc_error)?;

        Ok(SetResponse {
            success: response.into_inner().success,
        })
    }

    async fn delete(&self, request: DeleteRequest) -> HyperCacheResult<DeleteResponse> {
        debug!("Remote Delete: {}", request.key);

        let response = self
            .client
            .clone()
            .delete(cache::DeleteRequest {
                user_id: request.key.user_id,
                key: request.key.key,
            })
            .await
            .map_err(map_grpc_error)?;

        Ok(DeleteResponse {
            success: response.into_inner().success,
        })
    }

    async fn ping(&self) -> HyperCacheResult<()> {
        let response = self
            .health
            .clone()
            .check(HealthCheckRequest {
                service: CACHE_SERVICE_NAME.to_string(),
            })
            .await
            .map_err(map_grpc_error)?;

        match response.into_inner().status() {
            ServingStatus::Serving => Ok(()),
            status => Err(HyperCacheError::store_unavailable(format!(
                "cache service reports {}",
                status.as_str_name()
            ))),
        }
    }
}

/// Maps a gRPC status back to the service error it was produced from.
///
/// Transport failures surface as `UNAVAILABLE` and therefore as
/// [`HyperCacheError::StoreUnavailable`], same as a store outage behind a
/// healthy service.
pub fn map_grpc_error(status: tonic::Status) -> HyperCacheError {
    let message = status.message().to_string();
    match status.code() {
        tonic::Code::Unavailable => HyperCacheError::StoreUnavailable(message),
        tonic::Code::InvalidArgument => HyperCacheError::InvalidArgument(message),
        tonic::Code::NotFound => HyperCacheError::NotFound(message),
        _ => HyperCacheError::Internal(format!("gRPC error: {}", message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::{Code, Status};

    #[test]
    fn test_map_grpc_error_preserves_classification() {
        assert!(matches!(
            map_grpc_error(Status::unavailable("cache store unavailable")),
            HyperCacheError::StoreUnavailable(_)
        ));
        assert!(matches!(
            map_grpc_error(Status::invalid_argument("bad")),
            HyperCacheError::InvalidArgument(_)
        ));
        assert!(matches!(
            map_grpc_error(Status::not_found("key not found")),
            HyperCacheError::NotFound(_)
        ));
        assert!(matches!(
            map_grpc_error(Status::new(Code::Internal, "internal error")),
            HyperCacheError::Internal(_)
        ));
        assert!(matches!(
            map_grpc_error(Status::new(Code::DeadlineExceeded, "late")),
            HyperCacheError::Internal(_)
        ));
    }

    #[test]
    fn test_invalid_address_is_configuration_error() {
        let result = RemoteCacheServiceClient::connect_lazy("not a uri");
        assert!(matches!(result, Err(HyperCacheError::Configuration(_))));
    }
}
