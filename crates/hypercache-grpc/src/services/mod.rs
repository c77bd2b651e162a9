//! gRPC service implementations.

mod cache_service;
mod health_service;

pub use cache_service::*;
pub use health_service::*;
