//! User-scoped keys and the store key codec.
//!
//! Every cache entry lives in the namespace of the user that wrote it. The
//! store key is `hypercache:{len}:{user_id}:{key}` where `len` is the byte
//! length of `user_id`. Because the prefix pins down where the user id ends,
//! neither field needs escaping and a colon inside either field cannot make
//! two pairs collide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefix for every key written by the gateway.
pub const STORE_KEY_PREFIX: &str = "hypercache";

/// A `(user_id, key)` pair identifying one entry in a user's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserScopedKey {
    pub user_id: String,
    pub key: String,
}

impl UserScopedKey {
    /// Creates a new user-scoped key.
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            key: key.into(),
        }
    }

    /// Returns the store key for this pair.
    #[must_use]
    pub fn store_key(&self) -> String {
        encode(&self.user_id, &self.key)
    }

    /// Returns true if either component is empty.
    #[must_use]
    pub fn has_empty_component(&self) -> bool {
        self.user_id.is_empty() || self.key.is_empty()
    }
}

impl fmt::Display for UserScopedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.key)
    }
}

/// Derives the store key for `(user_id, key)`.
#[must_use]
pub fn encode(user_id: &str, key: &str) -> String {
    format!("{}:{}:{}:{}", STORE_KEY_PREFIX, user_id.len(), user_id, key)
}

/// Splits a store key produced by [`encode`] back into its pair.
///
/// Returns `None` for anything `encode` could not have produced.
#[must_use]
pub fn decode(store_key: &str) -> Option<UserScopedKey> {
    let rest = store_key.strip_prefix(STORE_KEY_PREFIX)?.strip_prefix(':')?;
    let (len, rest) = rest.split_once(':')?;
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if len.len() > 1 && len.starts_with('0') {
        return None;
    }
    let len: usize = len.parse().ok()?;
    if !rest.is_char_boundary(len) || rest.len() < len + 1 {
        return None;
    }
    let (user_id, rest) = rest.split_at(len);
    let key = rest.strip_prefix(':')?;
    Some(UserScopedKey::new(user_id, key))
}
