//! # Mesh Coordination Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/     # Cross-subsystem flows
//! │   ├── fixtures.rs      # Wiring over one in-memory store
//! │   ├── flows.rs         # Register, enable routes, resolve, translate
//! │   ├── staleness.rs     # Change ledger driving map freshness
//! │   └── lifecycle.rs     # Lifecycle and map-update events on the bus
//! └── benches/             # Peer resolution and translation throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mc-tests
//! cargo test -p mc-tests integration::staleness
//! cargo bench -p mc-tests
//! ```

pub mod integration;
