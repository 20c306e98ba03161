//! # Adapters Layer
//!
//! Implementations of the outbound ports.

pub mod ledger;

pub use ledger::StateChangeLedger;
