//! # HyperCache Config
//!
//! Configuration management for HyperCache.
//! Supports layered configuration from files and environment variables.

mod app_config;
mod deployment;
mod loader;

pub use app_config::*;
pub use deployment::*;
pub use loader::*;
