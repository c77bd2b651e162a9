//! Cache service trait definition.

use crate::dto::{DeleteRequest, DeleteResponse, GetRequest, GetResponse, SetRequest, SetResponse};
use async_trait::async_trait;
use hypercache_core::HyperCacheResult;

/// Cache service trait.
///
/// Implemented locally by [`CacheServiceImpl`](crate::CacheServiceImpl) and
/// remotely by the gRPC client the HTTP gateway uses, so both sides of the
/// internal hop share one contract.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads a value. An absent key is `Ok` with no value.
    async fn get(&self, request: GetRequest) -> HyperCacheResult<GetResponse>;

    /// Writes a value with an optional expiration.
    async fn set(&self, request: SetRequest) -> HyperCacheResult<SetResponse>;

    /// Removes a value. Removing an absent key succeeds.
    async fn delete(&self, request: DeleteRequest) -> HyperCacheResult<DeleteResponse>;

    /// Checks that the backing store can be reached.
    async fn ping(&self) -> HyperCacheResult<()>;
}
