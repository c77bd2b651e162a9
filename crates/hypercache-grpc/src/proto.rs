//! Generated protobuf types.

pub mod cache {
    tonic::include_proto!("hypercache.cache");
}

pub mod health {
    tonic::include_proto!("grpc.health.v1");
}

/// Fully-qualified name the health service reports the cache service under.
pub const CACHE_SERVICE_NAME: &str = "hypercache.cache.CacheService";
