//! # Domain Layer
//!
//! Pure registry rules with no I/O.

pub mod expiry;

pub use expiry::{ExpiryDecision, ExpiryPolicy};
