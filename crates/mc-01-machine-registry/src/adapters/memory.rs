//! In-Memory Store Adapter
//!
//! One backing store implementing machine rows, sharing grants and namespace
//! lookup. Locks are never held across an await point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{Machine, MeshError, MeshResult, Namespace, SharedMachine};
use std::collections::BTreeMap;

use crate::ports::outbound::{MachineStore, NamespaceLookup, SharingSource};

#[derive(Debug, Default)]
struct StoreState {
    namespaces: BTreeMap<u64, Namespace>,
    machines: BTreeMap<u64, Machine>,
    /// Grant id -> (machine id, target namespace id).
    shares: BTreeMap<u64, (u64, u64)>,
    next_namespace_id: u64,
    next_machine_id: u64,
    next_share_id: u64,
    unavailable: bool,
}

impl StoreState {
    fn check_available(&self) -> MeshResult<()> {
        if self.unavailable {
            return Err(MeshError::StoreFailure("store unavailable".into()));
        }
        Ok(())
    }

    fn insert(&mut self, machine: Machine) -> MeshResult<()> {
        if self
            .machines
            .values()
            .any(|m| m.machine_key == machine.machine_key && m.id != machine.id)
        {
            return Err(MeshError::StoreFailure(format!(
                "machine key {} already in use",
                machine.machine_key
            )));
        }
        self.next_machine_id = self.next_machine_id.max(machine.id);
        self.machines.insert(machine.id, machine);
        Ok(())
    }

    fn live_machine(&self, id: u64) -> Option<&Machine> {
        self.machines.get(&id).filter(|m| !m.is_deleted())
    }

    fn grants<F>(&self, keep: F) -> Vec<SharedMachine>
    where
        F: Fn(u64, u64) -> bool,
    {
        self.shares
            .iter()
            .filter(|(_, (machine_id, namespace_id))| keep(*machine_id, *namespace_id))
            .filter_map(|(id, (machine_id, namespace_id))| {
                Some(SharedMachine {
                    id: *id,
                    machine: self.live_machine(*machine_id)?.clone(),
                    namespace: self.namespaces.get(namespace_id)?.clone(),
                })
            })
            .collect()
    }
}

/// In-memory backing store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace. Ids are assigned from 1.
    pub fn create_namespace(&self, name: &str, at: DateTime<Utc>) -> Namespace {
        let mut state = self.state.write();
        state.next_namespace_id += 1;
        let namespace = Namespace::new(state.next_namespace_id, name, at);
        state.namespaces.insert(namespace.id, namespace.clone());
        namespace
    }

    /// Create a pending, unregistered machine with the next free id.
    pub fn create_machine(
        &self,
        machine_key: &str,
        name: &str,
        namespace: &Namespace,
        at: DateTime<Utc>,
    ) -> MeshResult<Machine> {
        let mut state = self.state.write();
        let machine = Machine::new(
            state.next_machine_id + 1,
            machine_key,
            name,
            namespace.clone(),
            at,
        );
        state.insert(machine.clone())?;
        Ok(machine)
    }

    /// Insert a prepared machine row. The identity key must be unique.
    pub fn insert_machine(&self, machine: Machine) -> MeshResult<()> {
        self.state.write().insert(machine)
    }

    /// Share a machine into a namespace, returning the grant id.
    pub fn share_machine(&self, machine_id: u64, namespace_id: u64) -> MeshResult<u64> {
        let mut state = self.state.write();
        if state.live_machine(machine_id).is_none() {
            return Err(MeshError::machine_not_found(machine_id));
        }
        if !state.namespaces.contains_key(&namespace_id) {
            return Err(MeshError::namespace_not_found(namespace_id));
        }
        state.next_share_id += 1;
        let id = state.next_share_id;
        state.shares.insert(id, (machine_id, namespace_id));
        Ok(id)
    }

    /// A row regardless of its soft-delete marker.
    pub fn find_unscoped(&self, id: u64) -> Option<Machine> {
        self.state.read().machines.get(&id).cloned()
    }

    /// Number of sharing grants.
    pub fn share_count(&self) -> usize {
        self.state.read().shares.len()
    }

    /// Make every port call fail with `StoreFailure` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unavailable = unavailable;
    }
}

#[async_trait]
impl MachineStore for InMemoryStore {
    async fn list_machines(&self) -> MeshResult<Vec<Machine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state.machines.values().filter(|m| !m.is_deleted()).cloned().collect())
    }

    async fn machines_in_namespace(&self, namespace_id: u64) -> MeshResult<Vec<Machine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state
            .machines
            .values()
            .filter(|m| !m.is_deleted() && m.namespace_id() == namespace_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: u64) -> MeshResult<Option<Machine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state.live_machine(id).cloned())
    }

    async fn find_by_machine_key(&self, machine_key: &str) -> MeshResult<Option<Machine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state
            .machines
            .values()
            .find(|m| !m.is_deleted() && m.machine_key == machine_key)
            .cloned())
    }

    async fn save(&self, machine: &Machine) -> MeshResult<()> {
        let mut state = self.state.write();
        state.check_available()?;
        state.insert(machine.clone())
    }

    async fn soft_delete(&self, id: u64, at: DateTime<Utc>) -> MeshResult<()> {
        let mut state = self.state.write();
        state.check_available()?;
        let machine = state
            .machines
            .get_mut(&id)
            .filter(|m| !m.is_deleted())
            .ok_or_else(|| MeshError::machine_not_found(id))?;
        machine.deleted_at = Some(at);
        Ok(())
    }

    async fn hard_delete(&self, id: u64) -> MeshResult<()> {
        let mut state = self.state.write();
        state.check_available()?;
        state
            .machines
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| MeshError::machine_not_found(id))
    }
}

#[async_trait]
impl SharingSource for InMemoryStore {
    async fn shared_into(&self, namespace_id: u64) -> MeshResult<Vec<SharedMachine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state.grants(|_, target| target == namespace_id))
    }

    async fn shares_of(&self, machine_id: u64) -> MeshResult<Vec<SharedMachine>> {
        let state = self.state.read();
        state.check_available()?;
        Ok(state.grants(|shared, _| shared == machine_id))
    }

    async fn unshare_from_all(&self, machine_id: u64) -> MeshResult<()> {
        let mut state = self.state.write();
        state.check_available()?;
        let before = state.shares.len();
        state.shares.retain(|_, (shared, _)| *shared != machine_id);
        if state.shares.len() == before {
            return Err(MeshError::NotShared(machine_id));
        }
        Ok(())
    }
}

#[async_trait]
impl NamespaceLookup for InMemoryStore {
    async fn namespace_by_name(&self, name: &str) -> MeshResult<Namespace> {
        let state = self.state.read();
        state.check_available()?;
        state
            .namespaces
            .values()
            .find(|ns| ns.name == name)
            .cloned()
            .ok_or_else(|| MeshError::namespace_not_found(name))
    }
}
