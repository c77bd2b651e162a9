//! gRPC server setup.

use crate::proto::{cache, health};
use crate::services::{CacheGrpcService, HealthServiceImpl};
use hypercache_core::{HyperCacheError, HyperCacheResult};
use hypercache_service::CacheService;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

/// gRPC server exposing the cache service and the standard health service.
///
/// The listener is bound in [`GrpcServer::bind`], before anything is served,
/// so callers can learn the actual address and connect to it right away.
pub struct GrpcServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    cache_service: Arc<dyn CacheService>,
    max_message_size: usize,
}

/// tonic's own decoding limit, used until [`GrpcServer::with_max_message_size`] is called.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

impl GrpcServer {
    /// Binds the server to `addr` (`host:port`; port 0 picks a free port).
    pub async fn bind(addr: &str, cache_service: Arc<dyn CacheService>) -> HyperCacheResult<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            HyperCacheError::Configuration(format!("Failed to bind gRPC address {}: {}", addr, e))
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| HyperCacheError::Internal(format!("gRPC listener address: {}", e)))?;

        Ok(Self {
            listener,
            local_addr,
            cache_service,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        })
    }

    /// Sets the largest cache message the server will decode or encode.
    #[must_use]
    pub fn with_max_message_size(mut self, limit: usize) -> Self {
        self.max_message_size = limit;
        self
    }

    /// Returns the address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until `signal` completes, then drains in-flight calls.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> HyperCacheResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Starting gRPC server on {}", self.local_addr);

        let health_service = HealthServiceImpl::new(self.cache_service.clone());
        let cache_grpc_service = CacheGrpcService::new(self.cache_service);

        Server::builder()
            .add_service(health::health_server::HealthServer::new(health_service))
            .add_service(
                cache::cache_service_server::CacheServiceServer::new(cache_grpc_service)
                    .max_decoding_message_size(self.max_message_size)
                    .max_encoding_message_size(self.max_message_size),
            )
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), signal)
            .await
            .map_err(|e| HyperCacheError::Internal(format!("gRPC server error: {}", e)))?;

        info!("gRPC server stopped");
        Ok(())
    }
}

/// Returns the URL a client should use to reach a server bound at `addr`.
///
/// An unspecified bind address (`0.0.0.0` or `::`) is replaced by loopback.
pub fn client_url(addr: SocketAddr) -> String {
    let mut addr = addr;
    if addr.ip().is_unspecified() {
        let loopback = if addr.is_ipv4() {
            std::net::Ipv4Addr::LOCALHOST.into()
        } else {
            std::net::Ipv6Addr::LOCALHOST.into()
        };
        addr.set_ip(loopback);
    }
    format!("http://{}", addr)
}
