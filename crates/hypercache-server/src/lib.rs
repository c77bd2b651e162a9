//! # HyperCache Server Library
//!
//! Process bootstrap for the HyperCache server: staged startup of the store,
//! the internal gRPC service and the HTTP gateway according to the deployment
//! role, ordered shutdown, and logging setup.

pub mod app;
pub mod startup;
pub mod telemetry;

pub use app::{AppBuilder, RunningApp};
