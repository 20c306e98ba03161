//! Full wiring over one in-memory store: bus and change ledger behind a
//! notifier chain, lifecycle events on the same bus.

use chrono::{DateTime, Utc};
use mc_01_machine_registry::testing::{machine_key, FixedTimeSource};
use mc_01_machine_registry::{
    BusNotifier, InMemoryStore, MachineRegistry, MachineRegistryApi, NotifierChain,
    RegistryConfig, RegistryContext, RouteAuthority, TimeSource,
};
use mc_02_peer_resolution::{PeerResolver, StalenessDetector, StateChangeLedger};
use mc_03_node_translation::{NodeTranslator, TranslationContext};
use shared_bus::InMemoryEventBus;
use shared_types::{DiscoKey, JsonColumn, Machine, MeshResult, Namespace, NodeKey, KEY_LEN};
use std::sync::Arc;

/// Every subsystem of the coordination core, wired together.
pub struct Mesh {
    /// Backing store.
    pub store: Arc<InMemoryStore>,
    /// Shared event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Namespace change times.
    pub ledger: Arc<StateChangeLedger>,
    /// Controllable clock.
    pub clock: Arc<FixedTimeSource>,
    /// Machine lifecycle.
    pub registry: MachineRegistry,
    /// Route enablement.
    pub routes: RouteAuthority,
    /// Visible-peer sets.
    pub resolver: PeerResolver,
    /// Map freshness.
    pub staleness: StalenessDetector,
    /// Wire descriptors.
    pub translator: NodeTranslator,
}

impl Mesh {
    /// Wiring with `RegistryConfig::for_testing()`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(now, RegistryConfig::for_testing())
    }

    /// Wiring with an explicit registry configuration.
    pub fn with_config(now: DateTime<Utc>, config: RegistryConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(FixedTimeSource::new(now));
        let ledger = Arc::new(StateChangeLedger::new(clock.clone()));

        let notifier = NotifierChain::new()
            .with(Arc::new(BusNotifier::new(bus.clone())))
            .with(ledger.clone());
        let ctx = RegistryContext::in_memory(store.clone(), Arc::new(notifier), clock.clone(), config)
            .with_events(bus.clone());

        Self {
            registry: MachineRegistry::new(ctx.clone()),
            routes: RouteAuthority::new(ctx.clone()),
            resolver: PeerResolver::new(ctx.clone()),
            staleness: StalenessDetector::new(ctx, ledger.clone()),
            translator: NodeTranslator::new(TranslationContext::for_testing()),
            store,
            bus,
            ledger,
            clock,
        }
    }

    /// Create a namespace at the current clock time.
    pub fn namespace(&self, name: &str) -> Namespace {
        self.store.create_namespace(name, self.clock.now())
    }

    /// Create a pending machine with session keys derived from `seed`.
    pub async fn pending(&self, seed: u8, name: &str, namespace: &Namespace) -> MeshResult<Machine> {
        let mut machine =
            self.store
                .create_machine(&machine_key(seed), name, namespace, self.clock.now())?;
        machine.node_key = NodeKey([seed; KEY_LEN]).hex_string();
        machine.disco_key = DiscoKey([seed; KEY_LEN]).hex_string();
        self.registry.save_machine(&mut machine).await?;
        Ok(machine)
    }

    /// Create and register a machine in `namespace`.
    pub async fn enroll(&self, seed: u8, name: &str, namespace: &Namespace) -> MeshResult<Machine> {
        self.pending(seed, name, namespace).await?;
        self.registry
            .register_machine(&machine_key(seed), &namespace.name)
            .await
    }

    /// Store host metadata advertising `routes`.
    pub async fn advertise(&self, machine: &mut Machine, routes: &[&str]) -> MeshResult<()> {
        let quoted: Vec<String> = routes.iter().map(|r| format!("\"{r}\"")).collect();
        machine.host_info = JsonColumn::from_raw(format!(r#"{{"RoutableIPs":[{}]}}"#, quoted.join(",")));
        self.registry.save_machine(machine).await
    }
}
