//! Request and response objects for the cache service.

use hypercache_core::UserScopedKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    pub key: UserScopedKey,
}

impl GetRequest {
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: UserScopedKey::new(user_id, key),
        }
    }
}

/// Result of a read; `value` is `None` when the key is absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetResponse {
    pub value: Option<Vec<u8>>,
}

impl GetResponse {
    /// Creates a response carrying a value.
    #[must_use]
    pub fn found(value: Vec<u8>) -> Self {
        Self { value: Some(value) }
    }

    /// Creates a response for an absent key.
    #[must_use]
    pub fn not_found() -> Self {
        Self { value: None }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Write one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    pub key: UserScopedKey,
    pub value: Vec<u8>,
    /// Expiration in seconds; 0 means the entry never expires.
    pub expiration_seconds: u64,
}

impl SetRequest {
    pub fn new(
        user_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
        expiration_seconds: u64,
    ) -> Self {
        Self {
            key: UserScopedKey::new(user_id, key),
            value: value.into(),
            expiration_seconds,
        }
    }

    /// Returns the expiration as a store TTL.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        (self.expiration_seconds > 0).then(|| Duration::from_secs(self.expiration_seconds))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {
    pub success: bool,
}

/// Remove one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub key: UserScopedKey,
}

impl DeleteRequest {
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: UserScopedKey::new(user_id, key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}
