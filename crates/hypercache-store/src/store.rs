//! Store client trait for the remote key-value backend.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the store.
///
/// A missing key is not a failure: `get` reports it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connection, pool, or backend failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something other than what was asked for.
    #[error("malformed store reply: {0}")]
    Malformed(String),
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the cache service consumes from the store.
///
/// Implementations are shared across all in-flight requests and must be safe
/// for concurrent use.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()>;

    /// Removes `key`.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
