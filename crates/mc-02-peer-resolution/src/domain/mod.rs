//! # Domain Layer
//!
//! Pure peer-set rules with no I/O.

pub mod peers;

pub use peers::{is_stale, merge_channels, sort_by_id, staleness_scope};
