//! # Inbound Ports
//!
//! The API exposed to the poll handler.

use async_trait::async_trait;
use shared_types::{Machine, MeshResult};

/// Peer resolution - inbound port.
#[async_trait]
pub trait PeerResolutionApi: Send + Sync {
    /// Every machine `machine` may see, ascending by id.
    async fn peers(&self, machine: &Machine) -> MeshResult<Vec<Machine>>;
}

/// Map freshness - inbound port.
#[async_trait]
pub trait StalenessApi: Send + Sync {
    /// Whether the map last delivered to `machine` is out of date.
    ///
    /// `machine` is reloaded from the store first. Never fails: any lookup
    /// error counts as stale.
    async fn is_outdated(&self, machine: &mut Machine) -> bool;
}
