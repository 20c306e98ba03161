//! # Staleness Detector
//!
//! Decides whether the map last delivered to a machine predates the newest
//! change in any namespace it observes. Lookup failures are absorbed and
//! reported as stale.

use async_trait::async_trait;
use mc_01_machine_registry::{MachineRegistry, MachineRegistryApi, RegistryContext};
use mesh_telemetry::metrics::STALENESS_CHECKS;
use shared_types::Machine;
use std::sync::Arc;
use tracing::{trace, warn};

use super::resolver::PeerResolver;
use crate::domain::{is_stale, staleness_scope};
use crate::ports::inbound::StalenessApi;
use crate::ports::outbound::ChangeEventSource;

/// Staleness Detector - map freshness checks.
#[derive(Clone)]
pub struct StalenessDetector {
    registry: MachineRegistry,
    resolver: PeerResolver,
    changes: Arc<dyn ChangeEventSource>,
}

impl StalenessDetector {
    /// Create a detector over `ctx`, asking `changes` for change times.
    pub fn new(ctx: RegistryContext, changes: Arc<dyn ChangeEventSource>) -> Self {
        Self {
            registry: MachineRegistry::new(ctx.clone()),
            resolver: PeerResolver::new(ctx),
            changes,
        }
    }

    fn record(result: &str) {
        STALENESS_CHECKS.with_label_values(&[result]).inc();
    }
}

#[async_trait]
impl StalenessApi for StalenessDetector {
    async fn is_outdated(&self, machine: &mut Machine) -> bool {
        if let Err(e) = self.registry.refresh_machine(machine).await {
            warn!(machine = %machine.name, error = %e, "Refresh failed, assuming stale");
            Self::record("refresh_failed");
            return true;
        }

        let shared = match self.resolver.shared_peers(machine).await {
            Ok(shared) => shared,
            Err(e) => {
                warn!(machine = %machine.name, error = %e, "Shared peer lookup failed, assuming stale");
                Self::record("lookup_failed");
                return true;
            }
        };

        let namespaces: Vec<String> = staleness_scope(machine, &shared).into_iter().collect();
        let last_change = self.changes.last_state_change(&namespaces).await;

        trace!(
            machine = %machine.name,
            last_successful_update = ?machine.last_successful_update,
            last_state_change = ?last_change,
            namespaces = ?namespaces,
            "Checking if machine is missing updates"
        );

        let stale = is_stale(machine.last_successful_update, last_change);
        Self::record(if stale { "stale" } else { "fresh" });
        stale
    }
}
