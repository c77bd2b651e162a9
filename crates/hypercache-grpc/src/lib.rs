//! # HyperCache gRPC
//!
//! Internal gRPC surface of the cache service, plus the client the HTTP
//! gateway uses to reach it in every deployment role.

pub mod clients;
pub mod proto;
pub mod server;
pub mod services;

pub use clients::*;
pub use server::*;
pub use services::*;
