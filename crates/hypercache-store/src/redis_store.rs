//! Redis-backed store client.

use crate::{StoreClient, StoreError, StoreResult};
use async_trait::async_trait;
use deadpool_redis::redis::{AsyncCommands, ErrorKind, RedisError};
use deadpool_redis::{Pool, PoolError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Store client backed by a Redis connection pool.
#[derive(Clone)]
pub struct RedisStore {
    pool: Arc<Pool>,
}

impl RedisStore {
    /// Creates a new Redis store client.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Closes the underlying pool.
    pub fn close(&self) {
        self.pool.close();
    }

    async fn get_conn(&self) -> StoreResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(classify_pool_error)
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(classify_redis_error)?;

        match &value {
            Some(_) => debug!("Store hit for key '{}'", key),
            None => debug!("Store miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.get_conn().await?;

        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                    .await
                    .map_err(classify_redis_error)?;
                debug!("Stored key '{}' with TTL {}s", key, ttl_secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(classify_redis_error)?;
                debug!("Stored key '{}' without expiration", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(classify_redis_error)?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.get_conn().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(classify_redis_error)?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::Malformed(format!("unexpected PING reply: {}", pong)))
        }
    }
}

/// Maps a Redis error onto the store taxonomy.
///
/// Type mismatches mean the server answered but not with a value we can
/// read (e.g. `WRONGTYPE`); every other failure is treated as the store
/// being unavailable.
fn classify_redis_error(err: RedisError) -> StoreError {
    match err.kind() {
        ErrorKind::TypeError => StoreError::Malformed(err.to_string()),
        _ if err.code() == Some("WRONGTYPE") => StoreError::Malformed(err.to_string()),
        _ => StoreError::Unavailable(err.to_string()),
    }
}

fn classify_pool_error(err: PoolError) -> StoreError {
    StoreError::Unavailable(format!("Failed to get Redis connection: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_redis_pool;
    use hypercache_config::RedisConfig;

    fn unreachable_store() -> RedisStore {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 1,
            enabled: true,
        };
        RedisStore::new(create_redis_pool(&config).unwrap())
    }

    #[tokio::test]
    async fn test_unreachable_get_is_unavailable() {
        let store = unreachable_store();
        let result = store.get("hypercache:5:user1:key1").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_set_is_unavailable() {
        let store = unreachable_store();
        let result = store
            .set("hypercache:5:user1:key1", b"value1", Some(Duration::from_secs(60)))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_delete_is_unavailable() {
        let store = unreachable_store();
        let result = store.delete("hypercache:5:user1:key1").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_type_error_is_malformed() {
        let err = RedisError::from((ErrorKind::TypeError, "Response was of incompatible type"));
        assert!(matches!(classify_redis_error(err), StoreError::Malformed(_)));
    }

    #[test]
    fn test_io_error_is_unavailable() {
        let err = RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(matches!(classify_redis_error(err), StoreError::Unavailable(_)));
    }
}
