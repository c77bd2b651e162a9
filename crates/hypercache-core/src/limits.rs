//! Bounds on client-supplied values.

/// Longest expiration a client may request: ten years, in seconds.
///
/// Every store backend can represent a deadline this far out.
pub const MAX_EXPIRATION_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
