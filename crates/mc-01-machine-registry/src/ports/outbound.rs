//! # Outbound Ports
//!
//! Traits for the collaborators the registry depends on: the backing store,
//! the sharing-relationship source, namespace lookup, map-update propagation,
//! address allocation and the clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Machine, MeshResult, Namespace, SharedMachine};
use std::net::IpAddr;

/// Backing store for machine rows - outbound port.
///
/// Soft-deleted rows are invisible to every read.
#[async_trait]
pub trait MachineStore: Send + Sync {
    /// Every machine, in id order.
    async fn list_machines(&self) -> MeshResult<Vec<Machine>>;

    /// Machines owned by a namespace, in id order.
    async fn machines_in_namespace(&self, namespace_id: u64) -> MeshResult<Vec<Machine>>;

    /// Machine by numeric id.
    async fn find_by_id(&self, id: u64) -> MeshResult<Option<Machine>>;

    /// Machine by hex identity key.
    async fn find_by_machine_key(&self, machine_key: &str) -> MeshResult<Option<Machine>>;

    /// Insert or replace the row with `machine.id`.
    async fn save(&self, machine: &Machine) -> MeshResult<()>;

    /// Mark the row deleted at `at`.
    async fn soft_delete(&self, id: u64, at: DateTime<Utc>) -> MeshResult<()>;

    /// Remove the row permanently.
    async fn hard_delete(&self, id: u64) -> MeshResult<()>;
}

/// Sharing relationships - outbound port.
#[async_trait]
pub trait SharingSource: Send + Sync {
    /// Grants whose target is `namespace_id`.
    async fn shared_into(&self, namespace_id: u64) -> MeshResult<Vec<SharedMachine>>;

    /// Grants that share `machine_id` into other namespaces.
    async fn shares_of(&self, machine_id: u64) -> MeshResult<Vec<SharedMachine>>;

    /// Revoke every grant of `machine_id`.
    ///
    /// Fails with `MeshError::NotShared` when there was nothing to revoke.
    async fn unshare_from_all(&self, machine_id: u64) -> MeshResult<()>;
}

/// Namespace resolution - outbound port.
#[async_trait]
pub trait NamespaceLookup: Send + Sync {
    /// Namespace by name. Fails with `NotFound` when unknown.
    async fn namespace_by_name(&self, name: &str) -> MeshResult<Namespace>;
}

/// Map-update propagation - outbound port.
///
/// Fire-and-forget: delivery is the implementation's concern.
#[async_trait]
pub trait MapUpdateNotifier: Send + Sync {
    /// Ask connected machines that can see `namespace` to refresh.
    async fn request_map_update(&self, namespace: &Namespace);
}

/// Overlay address allocation - outbound port.
#[async_trait]
pub trait IpAllocator: Send + Sync {
    /// A free overlay address.
    async fn allocate(&self) -> MeshResult<IpAddr>;
}

/// Abstract interface for getting current time.
pub trait TimeSource: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
