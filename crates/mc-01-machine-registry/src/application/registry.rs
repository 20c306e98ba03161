//! # Machine Registry Service
//!
//! Machine lookup, persistence, deletion, registration and expiry upkeep.
//! Every mutation that changes what peers see ends with a map-update request
//! for the owning namespace.

use async_trait::async_trait;
use mesh_telemetry::log_machine_event;
use mesh_telemetry::metrics::{EXPIRY_CLAMPS, MACHINE_DELETIONS, REGISTRATIONS};
use shared_bus::MeshEvent;
use shared_types::{Machine, MachineKey, MeshError, MeshResult, Namespace, RegisterMethod};
use tracing::{debug, error, info, trace};

use super::context::RegistryContext;
use crate::domain::{ExpiryDecision, ExpiryPolicy};
use crate::ports::inbound::MachineRegistryApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteMode {
    Soft,
    Hard,
}

impl DeleteMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

/// Machine Registry - owns machine records.
#[derive(Clone)]
pub struct MachineRegistry {
    ctx: RegistryContext,
    expiry: ExpiryPolicy,
}

impl MachineRegistry {
    /// Create a registry over `ctx`.
    pub fn new(ctx: RegistryContext) -> Self {
        let expiry = ExpiryPolicy::from_config(&ctx.config);
        Self { ctx, expiry }
    }

    /// The context this registry was built with.
    pub fn context(&self) -> &RegistryContext {
        &self.ctx
    }

    /// Revoke every sharing grant of `machine`. Having none is fine.
    async fn detach_sharing(&self, machine: &Machine) -> MeshResult<()> {
        match self.ctx.sharing.unshare_from_all(machine.id).await {
            Ok(()) | Err(MeshError::NotShared(_)) => Ok(()),
            Err(e) => {
                log_machine_event!(error, machine, "Failed to detach sharing", error = %e);
                Err(e)
            }
        }
    }

    async fn remove(&self, machine: &mut Machine, mode: DeleteMode) -> MeshResult<()> {
        self.detach_sharing(machine).await?;

        let namespace = machine.namespace.clone();
        match mode {
            DeleteMode::Soft => {
                // The caller's record changes only once the store has both writes.
                let now = self.ctx.now();
                let mut retired = machine.clone();
                retired.registered = false;
                retired.updated_at = now;
                self.ctx.store.save(&retired).await?;
                self.ctx.store.soft_delete(retired.id, now).await?;
                retired.deleted_at = Some(now);
                *machine = retired;
            }
            DeleteMode::Hard => self.ctx.store.hard_delete(machine.id).await?,
        }

        MACHINE_DELETIONS.with_label_values(&[mode.as_str()]).inc();
        log_machine_event!(info, machine, "Machine deleted", mode = mode.as_str());

        self.ctx
            .emit(MeshEvent::MachineDeleted {
                machine_id: machine.id,
                namespace_id: namespace.id,
                hard: mode == DeleteMode::Hard,
            })
            .await;
        self.ctx.notifier.request_map_update(&namespace).await;
        Ok(())
    }

    async fn namespace(&self, name: &str) -> MeshResult<Namespace> {
        self.ctx.namespaces.namespace_by_name(name).await
    }
}

#[async_trait]
impl MachineRegistryApi for MachineRegistry {
    async fn list_machines(&self) -> MeshResult<Vec<Machine>> {
        self.ctx.store.list_machines().await
    }

    async fn list_machines_in_namespace(&self, namespace: &str) -> MeshResult<Vec<Machine>> {
        let ns = self.namespace(namespace).await?;
        self.ctx.store.machines_in_namespace(ns.id).await
    }

    async fn get_machine(&self, namespace: &str, name: &str) -> MeshResult<Machine> {
        self.list_machines_in_namespace(namespace)
            .await?
            .into_iter()
            .find(|m| m.name == name)
            .ok_or_else(|| MeshError::machine_not_found(format!("{namespace}/{name}")))
    }

    async fn get_machine_by_id(&self, id: u64) -> MeshResult<Machine> {
        self.ctx
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| MeshError::machine_not_found(id))
    }

    async fn get_machine_by_machine_key(&self, machine_key: &str) -> MeshResult<Machine> {
        self.ctx
            .store
            .find_by_machine_key(machine_key)
            .await?
            .ok_or_else(|| MeshError::machine_not_found(machine_key))
    }

    async fn save_machine(&self, machine: &mut Machine) -> MeshResult<()> {
        machine.updated_at = self.ctx.now();
        self.ctx.store.save(machine).await
    }

    async fn refresh_machine(&self, machine: &mut Machine) -> MeshResult<()> {
        *machine = self.get_machine_by_id(machine.id).await?;
        Ok(())
    }

    async fn delete_machine(&self, machine: &mut Machine) -> MeshResult<()> {
        self.remove(machine, DeleteMode::Soft).await
    }

    async fn hard_delete_machine(&self, machine: &Machine) -> MeshResult<()> {
        let mut machine = machine.clone();
        self.remove(&mut machine, DeleteMode::Hard).await
    }

    async fn register_machine(&self, machine_key: &str, namespace: &str) -> MeshResult<Machine> {
        let key = MachineKey::from_hex(machine_key)?;
        let ns = self.namespace(namespace).await?;
        let mut machine = self.get_machine_by_machine_key(&key.hex_string()).await?;

        trace!(machine = %machine.name, "Attempting to register machine");

        if machine.is_already_registered() {
            error!(machine = %machine.name, "Machine already registered");
            return Err(MeshError::AlreadyRegistered(machine.name));
        }

        let ip = self.ctx.allocator.allocate().await.inspect_err(|e| {
            error!(machine = %machine.name, error = %e, "Could not find IP for the new machine");
        })?;

        machine.ip_address = ip.to_string();
        machine.namespace = ns.clone();
        machine.registered = true;
        machine.register_method = RegisterMethod::Cli;
        self.save_machine(&mut machine).await?;

        REGISTRATIONS.inc();
        log_machine_event!(info, machine, "Machine registered", ip = %ip);

        self.ctx
            .emit(MeshEvent::MachineRegistered {
                machine_id: machine.id,
                namespace_id: ns.id,
            })
            .await;
        self.ctx.notifier.request_map_update(&ns).await;
        Ok(machine)
    }

    async fn update_machine_expiry(
        &self,
        machine: &mut Machine,
    ) -> MeshResult<Option<ExpiryDecision>> {
        let now = self.ctx.now();
        let Some(decision) = self.expiry.apply(machine, now) else {
            return Ok(None);
        };

        debug!(
            machine = %machine.name,
            decision = decision.as_str(),
            expiry = ?machine.expiry,
            max_secs = self.ctx.config.max_machine_registration_secs,
            default_secs = self.ctx.config.default_machine_registration_secs,
            "Recomputed registration expiry"
        );
        EXPIRY_CLAMPS.with_label_values(&[decision.as_str()]).inc();

        self.save_machine(machine).await?;
        Ok(Some(decision))
    }
}
