//! # Registry Context
//!
//! Every collaborator handle and policy value a service needs, passed
//! explicitly into each service constructor.

use chrono::{DateTime, Utc};
use shared_bus::{EventPublisher, MeshEvent};
use std::sync::Arc;

use crate::adapters::{InMemoryStore, SequentialIpAllocator};
use crate::config::RegistryConfig;
use crate::ports::outbound::{
    IpAllocator, MachineStore, MapUpdateNotifier, NamespaceLookup, SharingSource, TimeSource,
};

/// Collaborators and configuration shared by the registry services.
#[derive(Clone)]
pub struct RegistryContext {
    /// Machine rows.
    pub store: Arc<dyn MachineStore>,
    /// Sharing grants.
    pub sharing: Arc<dyn SharingSource>,
    /// Namespace resolution.
    pub namespaces: Arc<dyn NamespaceLookup>,
    /// Map-update propagation.
    pub notifier: Arc<dyn MapUpdateNotifier>,
    /// Overlay address allocation.
    pub allocator: Arc<dyn IpAllocator>,
    /// Clock.
    pub clock: Arc<dyn TimeSource>,
    /// Lifecycle event sink for administrative observers.
    pub events: Option<Arc<dyn EventPublisher>>,
    /// Policy values.
    pub config: RegistryConfig,
}

impl RegistryContext {
    /// Context whose store, sharing and namespace ports are all `store`,
    /// allocating addresses from `config.ip_prefix`.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        notifier: Arc<dyn MapUpdateNotifier>,
        clock: Arc<dyn TimeSource>,
        config: RegistryConfig,
    ) -> Self {
        let allocator = SequentialIpAllocator::new(config.ip_prefix, store.clone());
        Self {
            store: store.clone(),
            sharing: store.clone(),
            namespaces: store,
            notifier,
            allocator: Arc::new(allocator),
            clock,
            events: None,
            config,
        }
    }

    /// Publish lifecycle events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Current time from the context clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) async fn emit(&self, event: MeshEvent) {
        if let Some(events) = &self.events {
            events.publish(event).await;
        }
    }
}
