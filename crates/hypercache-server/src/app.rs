//! Application bootstrap and shutdown.
//!
//! Startup is staged so that each component only starts once the one it
//! depends on is ready:
//!
//! 1. store client and cache service
//! 2. gRPC listener bound, gRPC server spawned
//! 3. gateway client connected, internal service reported as serving
//! 4. HTTP listener bound, HTTP server spawned
//!
//! Shutdown runs in reverse: HTTP stops accepting and drains, then the gRPC
//! server drains, then the Redis pool is closed.

use hypercache_config::{AppConfig, DeploymentRole, RedisConfig};
use hypercache_core::{HyperCacheError, HyperCacheResult};
use hypercache_grpc::{client_url, GrpcServer, RemoteCacheServiceClient};
use hypercache_rest::create_router;
use hypercache_service::{CacheService, CacheServiceImpl};
use hypercache_store::{create_redis_pool, MemoryStore, RedisStore, StoreClient};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Progress of an ordered shutdown, broadcast to the server tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ShutdownStage {
    Running,
    StopGateway,
    StopService,
}

type ServerTask = JoinHandle<HyperCacheResult<()>>;

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Starts every component the deployment role asks for.
    ///
    /// Returns once all servers are bound and running.
    pub async fn start(self) -> HyperCacheResult<RunningApp> {
        let config = self.config.unwrap_or_default();
        let role = config.deployment.role;
        let max_message_size = config.server.grpc_max_message_size();
        let (stage_tx, _) = watch::channel(ShutdownStage::Running);
        let stage = Arc::new(stage_tx);

        let mut app = RunningApp {
            rest_addr: None,
            grpc_addr: None,
            stage,
            rest_task: None,
            grpc_task: None,
            redis_store: None,
        };

        if role.has_service() {
            let (store, redis_store) = build_store(&config.redis)?;
            app.redis_store = redis_store;

            let cache_service: Arc<dyn CacheService> = Arc::new(CacheServiceImpl::new(store));
            let server = GrpcServer::bind(&config.server.grpc_addr(), cache_service)
                .await?
                .with_max_message_size(max_message_size);
            app.grpc_addr = Some(server.local_addr());

            let shutdown = wait_for_stage(app.stage.subscribe(), ShutdownStage::StopService);
            let stage = Arc::clone(&app.stage);
            app.grpc_task = Some(tokio::spawn(async move {
                let result = server.serve_with_shutdown(shutdown).await;
                report_exit("gRPC", &result, &stage);
                result
            }));
        }

        if role.has_gateway() {
            let client = match (role, app.grpc_addr) {
                (DeploymentRole::All, Some(addr)) => {
                    RemoteCacheServiceClient::connect(&client_url(addr)).await?
                }
                _ => {
                    let url = config.deployment.service_url.as_deref().ok_or_else(|| {
                        HyperCacheError::Configuration(
                            "deployment.service_url is required for the gateway role".to_string(),
                        )
                    })?;
                    info!("Connecting to cache service at: {}", url);
                    RemoteCacheServiceClient::connect_lazy(url)?
                }
            }
            .with_max_message_size(max_message_size);

            if let Err(e) = client
                .wait_until_serving(
                    config.deployment.readiness_attempts,
                    config.deployment.readiness_interval(),
                )
                .await
            {
                warn!("Starting HTTP gateway while the cache service is not serving: {}", e);
            }

            let router = create_router(Arc::new(client), &config.server);

            let rest_addr = config.server.rest_addr();
            let listener = TcpListener::bind(&rest_addr).await.map_err(|e| {
                HyperCacheError::Configuration(format!("Failed to bind REST address {}: {}", rest_addr, e))
            })?;
            let local_addr = listener
                .local_addr()
                .map_err(|e| HyperCacheError::Internal(format!("REST listener address: {}", e)))?;
            app.rest_addr = Some(local_addr);

            info!("Starting REST server on http://{}", local_addr);

            let shutdown = wait_for_stage(app.stage.subscribe(), ShutdownStage::StopGateway);
            let stage = Arc::clone(&app.stage);
            app.rest_task = Some(tokio::spawn(async move {
                let result = axum::serve(listener, router)
                    .with_graceful_shutdown(shutdown)
                    .await
                    .map_err(|e| HyperCacheError::Internal(format!("REST server error: {}", e)));
                report_exit("REST", &result, &stage);
                result
            }));
        }

        Ok(app)
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the started servers.
pub struct RunningApp {
    rest_addr: Option<SocketAddr>,
    grpc_addr: Option<SocketAddr>,
    stage: Arc<watch::Sender<ShutdownStage>>,
    rest_task: Option<ServerTask>,
    grpc_task: Option<ServerTask>,
    redis_store: Option<Arc<RedisStore>>,
}

impl RunningApp {
    /// Address of the HTTP gateway, if this role runs one.
    pub fn rest_addr(&self) -> Option<SocketAddr> {
        self.rest_addr
    }

    /// Address of the internal gRPC service, if this role runs one.
    pub fn grpc_addr(&self) -> Option<SocketAddr> {
        self.grpc_addr
    }

    /// Runs until `signal` completes or a server stops on its own, then shuts down.
    pub async fn run_until<F>(self, signal: F) -> HyperCacheResult<()>
    where
        F: Future<Output = ()>,
    {
        let server_stopped = wait_for_stage(self.stage.subscribe(), ShutdownStage::StopGateway);

        tokio::select! {
            () = signal => {}
            () = server_stopped => {
                warn!("A server stopped unexpectedly, shutting down");
            }
        }

        self.shutdown().await
    }

    /// Stops the HTTP gateway, then the gRPC service, then closes the store pool.
    pub async fn shutdown(self) -> HyperCacheResult<()> {
        self.stage.send_replace(ShutdownStage::StopGateway);
        let rest_result = join(self.rest_task).await;

        self.stage.send_replace(ShutdownStage::StopService);
        let grpc_result = join(self.grpc_task).await;

        if let Some(store) = self.redis_store {
            store.close();
            info!("Redis pool closed");
        }

        rest_result.and(grpc_result)
    }
}

/// Builds the store client; the returned `RedisStore` is kept for closing the pool.
fn build_store(
    redis_config: &RedisConfig,
) -> HyperCacheResult<(Arc<dyn StoreClient>, Option<Arc<RedisStore>>)> {
    if !redis_config.enabled {
        warn!("Redis is disabled, cache entries are kept in process memory");
        return Ok((Arc::new(MemoryStore::new()), None));
    }

    info!("Using Redis store at {}", redis_config.url);
    let pool = create_redis_pool(redis_config)?;
    let store = Arc::new(RedisStore::new(pool));
    Ok((store.clone(), Some(store)))
}

async fn wait_for_stage(mut rx: watch::Receiver<ShutdownStage>, stage: ShutdownStage) {
    // An error means the sender is gone, which also ends the wait.
    let _ = rx.wait_for(|current| *current >= stage).await;
}

/// Logs a server exit and, on failure, starts shutting everything else down.
fn report_exit(
    name: &str,
    result: &HyperCacheResult<()>,
    stage: &watch::Sender<ShutdownStage>,
) {
    match result {
        Ok(()) => info!("{} server stopped", name),
        Err(e) => {
            error!("{} server failed: {}", name, e);
            stage.send_replace(ShutdownStage::StopService);
        }
    }
}

async fn join(task: Option<ServerTask>) -> HyperCacheResult<()> {
    match task {
        Some(task) => task
            .await
            .map_err(|e| HyperCacheError::Internal(format!("Server task failed: {}", e)))?,
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(role: DeploymentRole) -> AppConfig {
        let mut config = AppConfig::default();
        config.deployment.role = role;
        config.server.rest_host = "127.0.0.1".to_string();
        config.server.rest_port = 0;
        config.server.grpc_host = "127.0.0.1".to_string();
        config.server.grpc_port = 0;
        config.redis.enabled = false;
        config
    }

    #[test]
    fn test_app_builder_default() {
        let builder = AppBuilder::default();
        assert!(builder.config.is_none());
    }

    #[test]
    fn test_app_builder_with_config() {
        let builder = AppBuilder::new().with_config(AppConfig::default());
        assert!(builder.config.is_some());
    }

    #[test]
    fn test_shutdown_stages_are_ordered() {
        assert!(ShutdownStage::Running < ShutdownStage::StopGateway);
        assert!(ShutdownStage::StopGateway < ShutdownStage::StopService);
    }

    #[test]
    fn test_memory_store_when_redis_disabled() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        let (_, redis_store) = build_store(&config).unwrap();
        assert!(redis_store.is_none());
    }

    #[tokio::test]
    async fn test_build_redis_store_is_lazy() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            ..RedisConfig::default()
        };
        let (_, redis_store) = build_store(&config).unwrap();
        assert!(redis_store.is_some());
    }

    #[tokio::test]
    async fn test_all_role_starts_both_servers() {
        let app = AppBuilder::new()
            .with_config(local_config(DeploymentRole::All))
            .start()
            .await
            .unwrap();

        assert!(app.rest_addr().is_some());
        assert!(app.grpc_addr().is_some());
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_service_role_starts_grpc_only() {
        let app = AppBuilder::new()
            .with_config(local_config(DeploymentRole::Service))
            .start()
            .await
            .unwrap();

        assert!(app.rest_addr().is_none());
        assert!(app.grpc_addr().is_some());
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_gateway_role_without_service_url_fails() {
        let result = AppBuilder::new()
            .with_config(local_config(DeploymentRole::Gateway))
            .start()
            .await;
        assert!(matches!(result, Err(HyperCacheError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_run_until_signal_shuts_down() {
        let app = AppBuilder::new()
            .with_config(local_config(DeploymentRole::All))
            .start()
            .await
            .unwrap();

        app.run_until(async {}).await.unwrap();
    }
}
