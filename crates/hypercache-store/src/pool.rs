//! Redis connection pool construction.

use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use hypercache_config::RedisConfig;
use hypercache_core::{HyperCacheError, HyperCacheResult};
use std::sync::Arc;
use tracing::info;

/// Creates the process-wide Redis pool.
///
/// Connections are opened lazily, so an unreachable server is not an error
/// here; it surfaces on the first store call.
pub fn create_redis_pool(redis_config: &RedisConfig) -> HyperCacheResult<Arc<Pool>> {
    let mut cfg = Config::from_url(&redis_config.url);
    cfg.pool = Some(PoolConfig::new(redis_config.pool_size.max(1)));

    let pool = cfg.create_pool(Some(Runtime::Tokio1)).map_err(|e| {
        HyperCacheError::Configuration(format!("Failed to create Redis pool: {}", e))
    })?;

    info!(pool_size = redis_config.pool_size, "Redis pool created");
    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creation_is_lazy() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 2,
            enabled: true,
        };
        let pool = create_redis_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, 2);
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let config = RedisConfig {
            url: "not a url".to_string(),
            pool_size: 2,
            enabled: true,
        };
        let result = create_redis_pool(&config);
        assert!(matches!(result, Err(HyperCacheError::Configuration(_))));
    }
}
