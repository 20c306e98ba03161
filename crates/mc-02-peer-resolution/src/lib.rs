//! # MC-02 Peer Resolution
//!
//! Works out which machines a polling machine may see and whether the map it
//! last received is out of date.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Visibility Channels
//!
//! | Channel | Members |
//! |---------|---------|
//! | Direct | Other registered machines in the same namespace |
//! | Shared | Machines shared into the machine's namespace |
//! | Shared-to | Whole roster of each namespace the machine is shared into |
//!
//! Channels are concatenated in that order and sorted by id. A machine
//! visible through two channels appears twice.
//!
//! ## Module Structure
//!
//! ```text
//! mc-02-peer-resolution/
//! ├── domain/          # Channel merge, staleness scope and rule
//! ├── ports/           # PeerResolutionApi, StalenessApi, ChangeEventSource
//! ├── application/     # PeerResolver, StalenessDetector
//! └── adapters/        # StateChangeLedger
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::StateChangeLedger;
pub use application::{PeerResolver, StalenessDetector};
pub use domain::{is_stale, merge_channels, staleness_scope};
pub use ports::{ChangeEventSource, PeerResolutionApi, StalenessApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
