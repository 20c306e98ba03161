//! # Ports Layer
//!
//! Inbound (driving) and outbound (driven) interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{MachineRegistryApi, RouteAuthorityApi};
pub use outbound::{
    IpAllocator, MachineStore, MapUpdateNotifier, NamespaceLookup, SharingSource,
    SystemTimeSource, TimeSource,
};
