//! # HyperCache REST
//!
//! Public HTTP gateway using Axum. Every cache request is translated into one
//! call on a [`CacheService`](hypercache_service::CacheService), which in a
//! running deployment is the remote gRPC client.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
