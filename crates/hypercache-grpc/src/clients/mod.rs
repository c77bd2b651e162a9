//! Remote client for the internal cache service.
//!
//! The HTTP gateway talks to the cache service only through this client, so
//! the gateway and the service can run in one process or in separate ones.

mod cache_client;

pub use cache_client::*;
