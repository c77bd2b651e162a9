//! Result type aliases for HyperCache.

use crate::HyperCacheError;

/// A specialized `Result` type for HyperCache operations.
pub type HyperCacheResult<T> = Result<T, HyperCacheError>;
