//! # HyperCache Core
//!
//! Core types, the user-scoped key codec, and error definitions shared by
//! every layer of HyperCache.

pub mod error;
pub mod key;
pub mod limits;
pub mod result;

pub use error::*;
pub use key::*;
pub use limits::*;
pub use result::*;
