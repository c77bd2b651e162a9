//! # HyperCache Service
//!
//! The cache service: user-scoped Get/Set/Delete over a [`StoreClient`],
//! including the translation of store failures into [`HyperCacheError`]s.
//!
//! [`StoreClient`]: hypercache_store::StoreClient
//! [`HyperCacheError`]: hypercache_core::HyperCacheError

pub mod cache_service;
pub mod cache_service_impl;
pub mod dto;

pub use cache_service::*;
pub use cache_service_impl::*;
pub use dto::*;
