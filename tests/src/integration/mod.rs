//! # Integration Tests
//!
//! Subsystems wired together the way a control server wires them.

pub mod fixtures;

mod flows;
mod lifecycle;
mod staleness;
