//! # HyperCache Store
//!
//! Clients for the remote key-value store behind the cache service.
//! The [`StoreClient`] trait is the seam the service layer depends on;
//! [`RedisStore`] talks to Redis through a `deadpool-redis` pool and
//! [`MemoryStore`] keeps entries in process memory for local runs and tests.

mod memory_store;
mod pool;
mod redis_store;
mod store;

pub use memory_store::MemoryStore;
pub use pool::create_redis_pool;
pub use redis_store::RedisStore;
pub use store::{StoreClient, StoreError, StoreResult};
