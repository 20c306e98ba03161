//! # MC-01 Machine Registry
//!
//! Owns machine records for the coordination server.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Machine lookup by namespace and name, numeric id, or identity key
//! - Soft and hard deletion, both detaching sharing grants first
//! - Registration with overlay address allocation
//! - Registration expiry clamping
//! - Enabling advertised subnet routes
//!
//! Every mutation that changes peer-visible state signals the owning
//! namespace's map update through `MapUpdateNotifier`.
//!
//! ## Module Structure
//!
//! ```text
//! mc-01-machine-registry/
//! ├── domain/          # ExpiryPolicy
//! ├── ports/           # API traits (inbound) + dependency traits (outbound)
//! ├── application/     # RegistryContext, MachineRegistry, RouteAuthority
//! ├── adapters/        # InMemoryStore, BusNotifier, SequentialIpAllocator
//! └── config.rs        # RegistryConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use adapters::{BusNotifier, InMemoryStore, NotifierChain, SequentialIpAllocator};
pub use application::{MachineRegistry, RegistryContext, RouteAuthority};
pub use config::{ConfigError, RegistryConfig};
pub use domain::{ExpiryDecision, ExpiryPolicy};
pub use ports::{
    IpAllocator, MachineRegistryApi, MachineStore, MapUpdateNotifier, NamespaceLookup,
    RouteAuthorityApi, SharingSource, SystemTimeSource, TimeSource,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
