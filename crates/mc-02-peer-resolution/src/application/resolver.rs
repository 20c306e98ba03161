//! # Peer Resolver
//!
//! Computes the visible-peer set of a machine from three channels, each
//! queried independently:
//!
//! 1. **Direct**: other registered machines in the same namespace.
//! 2. **Shared**: machines shared into the machine's namespace.
//! 3. **Shared-to**: the full roster of every namespace the machine itself
//!    is shared into.
//!
//! Results are concatenated in that order and sorted by id. A failing
//! channel aborts the whole resolution.

use async_trait::async_trait;
use mc_01_machine_registry::RegistryContext;
use mesh_telemetry::metrics::{PEERS_RESOLVED, PEER_RESOLUTIONS};
use shared_types::{Machine, MachineNames, MeshResult};
use tracing::{error, trace};

use crate::domain::{merge_channels, sort_by_id};
use crate::ports::inbound::PeerResolutionApi;

/// Peer Resolver - builds visible-peer lists.
#[derive(Clone)]
pub struct PeerResolver {
    ctx: RegistryContext,
}

impl PeerResolver {
    /// Create a resolver over `ctx`.
    pub fn new(ctx: RegistryContext) -> Self {
        Self { ctx }
    }

    /// Channel 1: registered machines in `machine`'s namespace, excluding it.
    pub async fn direct_peers(&self, machine: &Machine) -> MeshResult<Vec<Machine>> {
        trace!(machine = %machine.name, "Finding direct peers");

        let mut peers: Vec<Machine> = self
            .ctx
            .store
            .machines_in_namespace(machine.namespace_id())
            .await
            .inspect_err(|e| error!(error = %e, "Error accessing store"))?
            .into_iter()
            .filter(|m| m.registered && m.machine_key != machine.machine_key)
            .collect();
        sort_by_id(&mut peers);

        trace!(machine = %machine.name, "Found direct machines: {}", MachineNames(&peers));
        Ok(peers)
    }

    /// Channel 2: machines shared into `machine`'s namespace.
    pub async fn shared_peers(&self, machine: &Machine) -> MeshResult<Vec<Machine>> {
        trace!(machine = %machine.name, "Finding shared peers");

        let mut peers: Vec<Machine> = self
            .ctx
            .sharing
            .shared_into(machine.namespace_id())
            .await?
            .into_iter()
            .map(|grant| grant.machine)
            .collect();
        sort_by_id(&mut peers);

        trace!(machine = %machine.name, "Found shared peers: {}", MachineNames(&peers));
        Ok(peers)
    }

    /// Channel 3: every machine of each namespace `machine` is shared into.
    pub async fn shared_to_peers(&self, machine: &Machine) -> MeshResult<Vec<Machine>> {
        trace!(machine = %machine.name, "Finding peers in namespaces this machine is shared with");

        let mut peers = Vec::new();
        for grant in self.ctx.sharing.shares_of(machine.id).await? {
            let namespace = self
                .ctx
                .namespaces
                .namespace_by_name(&grant.namespace.name)
                .await?;
            peers.extend(self.ctx.store.machines_in_namespace(namespace.id).await?);
        }
        sort_by_id(&mut peers);

        trace!(machine = %machine.name, "Found peers we are shared with: {}", MachineNames(&peers));
        Ok(peers)
    }

    async fn resolve(&self, machine: &Machine) -> MeshResult<Vec<Machine>> {
        let direct = self.direct_peers(machine).await?;
        let shared = self.shared_peers(machine).await?;
        let shared_to = self.shared_to_peers(machine).await?;
        Ok(merge_channels(direct, shared, shared_to))
    }
}

#[async_trait]
impl PeerResolutionApi for PeerResolver {
    async fn peers(&self, machine: &Machine) -> MeshResult<Vec<Machine>> {
        match self.resolve(machine).await {
            Ok(peers) => {
                PEER_RESOLUTIONS.with_label_values(&["ok"]).inc();
                PEERS_RESOLVED.observe(peers.len() as f64);
                trace!(machine = %machine.name, "Found total peers: {}", MachineNames(&peers));
                Ok(peers)
            }
            Err(e) => {
                PEER_RESOLUTIONS.with_label_values(&["error"]).inc();
                error!(machine = %machine.name, error = %e, "Cannot fetch peers");
                Err(e)
            }
        }
    }
}
