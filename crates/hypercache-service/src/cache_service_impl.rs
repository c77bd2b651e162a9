//! Cache service implementation over a store client.

use crate::cache_service::CacheService;
use crate::dto::{DeleteRequest, DeleteResponse, GetRequest, GetResponse, SetRequest, SetResponse};
use async_trait::async_trait;
use hypercache_core::{
    HyperCacheError, HyperCacheResult, UserScopedKey, MAX_EXPIRATION_SECONDS,
};
use hypercache_store::{StoreClient, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache service backed by a [`StoreClient`].
///
/// Every operation derives the store key from the user-scoped key and issues
/// exactly one store call. Store failures are classified here and never
/// retried.
pub struct CacheServiceImpl {
    store: Arc<dyn StoreClient>,
}

impl CacheServiceImpl {
    /// Creates a new cache service.
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CacheService for CacheServiceImpl {
    async fn get(&self, request: GetRequest) -> HyperCacheResult<GetResponse> {
        debug!("Get: {}", request.key);

        let store_key = request.key.store_key();
        let value = self
            .store
            .get(&store_key)
            .await
            .map_err(|e| to_service_error(&request.key, e))?;

        Ok(GetResponse { value })
    }

    async fn set(&self, request: SetRequest) -> HyperCacheResult<SetResponse> {
        debug!(
            "Set: {} ({} bytes, expiration {}s)",
            request.key,
            request.value.len(),
            request.expiration_seconds
        );

        if request.expiration_seconds > MAX_EXPIRATION_SECONDS {
            return Err(HyperCacheError::invalid_argument(format!(
                "expiration_seconds must not exceed {}",
                MAX_EXPIRATION_SECONDS
            )));
        }

        let store_key = request.key.store_key();
        self.store
            .set(&store_key, &request.value, request.ttl())
            .await
            .map_err(|e| to_service_error(&request.key, e))?;

        Ok(SetResponse { success: true })
    }

    async fn delete(&self, request: DeleteRequest) -> HyperCacheResult<DeleteResponse> {
        debug!("Delete: {}", request.key);

        let store_key = request.key.store_key();
        let existed = self
            .store
            .delete(&store_key)
            .await
            .map_err(|e| to_service_error(&request.key, e))?;

        if !existed {
            debug!("Delete of absent key {}", request.key);
        }

        Ok(DeleteResponse { success: true })
    }

    async fn ping(&self) -> HyperCacheResult<()> {
        self.store.ping().await.map_err(|e| {
            warn!("Store ping failed: {}", e);
            match e {
                StoreError::Unavailable(msg) => HyperCacheError::StoreUnavailable(msg),
                StoreError::Malformed(msg) => HyperCacheError::Internal(msg),
            }
        })
    }
}

fn to_service_error(key: &UserScopedKey, err: StoreError) -> HyperCacheError {
    warn!("Store operation for {} failed: {}", key, err);

    match err {
        StoreError::Unavailable(msg) => HyperCacheError::StoreUnavailable(msg),
        StoreError::Malformed(msg) => HyperCacheError::Internal(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypercache_store::{MemoryStore, StoreResult};
    use mockall::mock;
    use std::time::Duration;

    mock! {
        pub Store {}

        #[async_trait]
        impl StoreClient for Store {
            async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
            async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()>;
            async fn delete(&self, key: &str) -> StoreResult<bool>;
            async fn ping(&self) -> StoreResult<()>;
        }
    }

    fn memory_service() -> CacheServiceImpl {
        CacheServiceImpl::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_set_get_delete_lifecycle() {
        let service = memory_service();

        let set = service
            .set(SetRequest::new("user1", "key1", "value1", 60))
            .await
            .unwrap();
        assert!(set.success);

        let got = service.get(GetRequest::new("user1", "key1")).await.unwrap();
        assert_eq!(got.value, Some(b"value1".to_vec()));

        let deleted = service
            .delete(DeleteRequest::new("user1", "key1"))
            .await
            .unwrap();
        assert!(deleted.success);

        let got = service.get(GetRequest::new("user1", "key1")).await.unwrap();
        assert!(!got.is_found());
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_an_error() {
        let service = memory_service();
        let got = service
            .get(GetRequest::new("user1", "missingkey"))
            .await
            .unwrap();
        assert_eq!(got, GetResponse::not_found());
    }

    #[tokio::test]
    async fn test_empty_value_round_trips() {
        let service = memory_service();
        service
            .set(SetRequest::new("user1", "empty", Vec::new(), 0))
            .await
            .unwrap();
        let got = service.get(GetRequest::new("user1", "empty")).await.unwrap();
        assert_eq!(got.value, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = memory_service();
        service
            .set(SetRequest::new("user1", "key1", "value1", 0))
            .await
            .unwrap();

        let first = service.delete(DeleteRequest::new("user1", "key1")).await.unwrap();
        let second = service.delete(DeleteRequest::new("user1", "key1")).await.unwrap();
        assert!(first.success);
        assert!(second.success);

        let got = service.get(GetRequest::new("user1", "key1")).await.unwrap();
        assert!(!got.is_found());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let service = memory_service();
        service
            .set(SetRequest::new("user1", "k", "one", 0))
            .await
            .unwrap();
        service
            .set(SetRequest::new("user2", "k", "two", 0))
            .await
            .unwrap();

        let one = service.get(GetRequest::new("user1", "k")).await.unwrap();
        let two = service.get(GetRequest::new("user2", "k")).await.unwrap();
        assert_eq!(one.value, Some(b"one".to_vec()));
        assert_eq!(two.value, Some(b"two".to_vec()));

        service.delete(DeleteRequest::new("user1", "k")).await.unwrap();
        let two = service.get(GetRequest::new("user2", "k")).await.unwrap();
        assert_eq!(two.value, Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn test_empty_components_are_accepted() {
        let service = memory_service();
        service
            .set(SetRequest::new("", "k", "v", 0))
            .await
            .unwrap();
        let got = service.get(GetRequest::new("", "k")).await.unwrap();
        assert_eq!(got.value, Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_set_passes_encoded_key_and_ttl() {
        let mut store = MockStore::new();
        store
            .expect_set()
            .withf(|key, value, ttl| {
                key == "hypercache:5:user1:key1"
                    && value == b"value1"
                    && *ttl == Some(Duration::from_secs(60))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = CacheServiceImpl::new(Arc::new(store));
        let response = service
            .set(SetRequest::new("user1", "key1", "value1", 60))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_set_without_expiration_passes_no_ttl() {
        let mut store = MockStore::new();
        store
            .expect_set()
            .withf(|_, _, ttl| ttl.is_none())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = CacheServiceImpl::new(Arc::new(store));
        service
            .set(SetRequest::new("user1", "key1", "value1", 0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_rejects_expiration_beyond_limit() {
        let mut store = MockStore::new();
        store.expect_set().times(0);

        let service = CacheServiceImpl::new(Arc::new(store));
        let result = service
            .set(SetRequest::new("user1", "key1", "v", MAX_EXPIRATION_SECONDS + 1))
            .await;
        assert!(matches!(result, Err(HyperCacheError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_set_accepts_expiration_at_limit() {
        let service = memory_service();
        let response = service
            .set(SetRequest::new("user1", "key1", "v", MAX_EXPIRATION_SECONDS))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_get_transport_failure_is_store_unavailable() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = CacheServiceImpl::new(Arc::new(store));
        let result = service.get(GetRequest::new("user1", "key1")).await;
        assert!(matches!(result, Err(HyperCacheError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_get_malformed_reply_is_internal() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Malformed("WRONGTYPE".to_string())));

        let service = CacheServiceImpl::new(Arc::new(store));
        let result = service.get(GetRequest::new("user1", "key1")).await;
        assert!(matches!(result, Err(HyperCacheError::Internal(_))));
    }

    #[tokio::test]
    async fn test_set_failure_is_store_unavailable() {
        let mut store = MockStore::new();
        store
            .expect_set()
            .returning(|_, _, _| Err(StoreError::Unavailable("pool timeout".to_string())));

        let service = CacheServiceImpl::new(Arc::new(store));
        let result = service.set(SetRequest::new("user1", "key1", "v", 0)).await;
        assert!(matches!(result, Err(HyperCacheError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_failure_is_store_unavailable() {
        let mut store = MockStore::new();
        store
            .expect_delete()
            .returning(|_| Err(StoreError::Unavailable("broken pipe".to_string())));

        let service = CacheServiceImpl::new(Arc::new(store));
        let result = service.delete(DeleteRequest::new("user1", "key1")).await;
        assert!(matches!(result, Err(HyperCacheError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_absent_key_reports_success() {
        let mut store = MockStore::new();
        store.expect_delete().times(1).returning(|_| Ok(false));

        let service = CacheServiceImpl::new(Arc::new(store));
        let response = service
            .delete(DeleteRequest::new("user1", "key1"))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_ping_failure_is_store_unavailable() {
        let mut store = MockStore::new();
        store
            .expect_ping()
            .returning(|| Err(StoreError::Unavailable("down".to_string())));

        let service = CacheServiceImpl::new(Arc::new(store));
        assert!(matches!(
            service.ping().await,
            Err(HyperCacheError::StoreUnavailable(_))
        ));
    }
}
