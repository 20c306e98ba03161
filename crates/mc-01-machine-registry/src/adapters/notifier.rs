//! Map-Update Notifier Adapters
//!
//! `BusNotifier` turns a map-update request into a `MapUpdateRequested` event
//! on the shared bus; pollers subscribe and push fresh maps. `NotifierChain`
//! fans one request out to several notifiers.

use async_trait::async_trait;
use mesh_telemetry::metrics::MAP_UPDATES_REQUESTED;
use shared_bus::{EventPublisher, MeshEvent};
use shared_types::Namespace;
use std::sync::Arc;
use tracing::{debug, info};

use crate::ports::outbound::MapUpdateNotifier;

/// Event bus adapter for map-update propagation.
pub struct BusNotifier {
    event_bus: Arc<dyn EventPublisher>,
}

impl BusNotifier {
    /// Create a new adapter with the given event bus.
    pub fn new(event_bus: Arc<dyn EventPublisher>) -> Self {
        Self { event_bus }
    }
}

#[async_trait]
impl MapUpdateNotifier for BusNotifier {
    async fn request_map_update(&self, namespace: &Namespace) {
        let event = MeshEvent::MapUpdateRequested {
            namespace_id: namespace.id,
            namespace: namespace.name.clone(),
        };
        let receivers = self.event_bus.publish(event).await;
        MAP_UPDATES_REQUESTED.inc();

        if receivers == 0 {
            debug!(namespace = %namespace.name, "No subscribers for map update");
        } else {
            info!(namespace = %namespace.name, receivers, "Requested map update");
        }
    }
}

/// Forwards each request to every notifier in order.
#[derive(Default)]
pub struct NotifierChain {
    notifiers: Vec<Arc<dyn MapUpdateNotifier>>,
}

impl NotifierChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notifier.
    #[must_use]
    pub fn with(mut self, notifier: Arc<dyn MapUpdateNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Number of notifiers in the chain.
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Whether the chain forwards to nobody.
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl MapUpdateNotifier for NotifierChain {
    async fn request_map_update(&self, namespace: &Namespace) {
        for notifier in &self.notifiers {
            notifier.request_map_update(namespace).await;
        }
    }
}
