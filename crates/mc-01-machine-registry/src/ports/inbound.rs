//! # Inbound Ports
//!
//! The API the registry exposes to polling and administrative callers.

use async_trait::async_trait;
use ipnet::IpNet;
use shared_types::{Machine, MeshResult};

use crate::domain::ExpiryDecision;

/// Machine record management - inbound port.
#[async_trait]
pub trait MachineRegistryApi: Send + Sync {
    /// Every machine.
    async fn list_machines(&self) -> MeshResult<Vec<Machine>>;

    /// Machines owned by the named namespace.
    async fn list_machines_in_namespace(&self, namespace: &str) -> MeshResult<Vec<Machine>>;

    /// First machine named `name` in `namespace`. Fails with `NotFound`.
    async fn get_machine(&self, namespace: &str, name: &str) -> MeshResult<Machine>;

    /// Machine by numeric id. Fails with `NotFound`.
    async fn get_machine_by_id(&self, id: u64) -> MeshResult<Machine>;

    /// Machine by hex identity key. Fails with `NotFound`.
    async fn get_machine_by_machine_key(&self, machine_key: &str) -> MeshResult<Machine>;

    /// Persist changes to a machine.
    async fn save_machine(&self, machine: &mut Machine) -> MeshResult<()>;

    /// Reload a machine in place from the store.
    async fn refresh_machine(&self, machine: &mut Machine) -> MeshResult<()>;

    /// Detach sharing, unregister and mark the row deleted.
    async fn delete_machine(&self, machine: &mut Machine) -> MeshResult<()>;

    /// Detach sharing and purge the row.
    async fn hard_delete_machine(&self, machine: &Machine) -> MeshResult<()>;

    /// Complete registration of a pending machine.
    async fn register_machine(&self, machine_key: &str, namespace: &str) -> MeshResult<Machine>;

    /// Re-derive the expiry of a lapsed machine and persist it.
    ///
    /// Returns `None` and persists nothing when the registration is valid.
    async fn update_machine_expiry(
        &self,
        machine: &mut Machine,
    ) -> MeshResult<Option<ExpiryDecision>>;
}

/// Subnet route administration - inbound port.
#[async_trait]
pub trait RouteAuthorityApi: Send + Sync {
    /// Routes the machine advertises in its host metadata.
    fn get_advertised_routes(&self, machine: &Machine) -> MeshResult<Vec<IpNet>>;

    /// Routes currently enabled for the machine.
    fn get_enabled_routes(&self, machine: &Machine) -> MeshResult<Vec<IpNet>>;

    /// Membership query against the enabled set. Malformed input is `false`.
    fn is_routes_enabled(&self, machine: &Machine, route: &str) -> bool;

    /// Replace the enabled set with `routes`, all of which must be advertised.
    async fn enable_routes(&self, machine: &mut Machine, routes: &[String]) -> MeshResult<()>;
}
