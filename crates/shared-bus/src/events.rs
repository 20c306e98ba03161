//! # Mesh Events
//!
//! Defines all event types that flow through the shared bus.
//!
//! The only event connected pollers must react to is `MapUpdateRequested`;
//! the lifecycle events exist so administrative observers can follow what
//! caused the refresh.

use serde::{Deserialize, Serialize};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshEvent {
    // =========================================================================
    // MAP PROPAGATION
    // =========================================================================
    /// Peer-visible state in a namespace changed; connected machines that can
    /// see this namespace should be sent a fresh network map.
    MapUpdateRequested {
        /// Identity of the namespace whose state changed.
        namespace_id: u64,
        /// Namespace name, for subscribers keyed by name.
        namespace: String,
    },

    // =========================================================================
    // MACHINE LIFECYCLE
    // =========================================================================
    /// A machine completed registration.
    MachineRegistered {
        /// Machine identity.
        machine_id: u64,
        /// Owning namespace identity.
        namespace_id: u64,
    },

    /// A machine was removed.
    MachineDeleted {
        /// Machine identity.
        machine_id: u64,
        /// Owning namespace identity.
        namespace_id: u64,
        /// Whether the row was purged rather than soft-deleted.
        hard: bool,
    },

    /// The enabled route set of a machine was replaced.
    RoutesEnabled {
        /// Machine identity.
        machine_id: u64,
        /// Owning namespace identity.
        namespace_id: u64,
        /// New enabled set, as prefix strings.
        routes: Vec<String>,
    },
}

impl MeshEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::MapUpdateRequested { .. } => EventTopic::MapUpdates,
            Self::MachineRegistered { .. } | Self::MachineDeleted { .. } => {
                EventTopic::MachineLifecycle
            }
            Self::RoutesEnabled { .. } => EventTopic::Routes,
        }
    }

    /// Namespace the event concerns.
    #[must_use]
    pub fn namespace_id(&self) -> u64 {
        match self {
            Self::MapUpdateRequested { namespace_id, .. }
            | Self::MachineRegistered { namespace_id, .. }
            | Self::MachineDeleted { namespace_id, .. }
            | Self::RoutesEnabled { namespace_id, .. } => *namespace_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Map refresh requests.
    MapUpdates,
    /// Registration and deletion.
    MachineLifecycle,
    /// Route changes.
    Routes,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Namespaces to include. Empty means all namespaces.
    pub namespaces: Vec<u64>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            namespaces: Vec::new(),
        }
    }

    /// Create a filter for events concerning specific namespaces.
    #[must_use]
    pub fn for_namespaces(namespaces: Vec<u64>) -> Self {
        Self {
            topics: Vec::new(),
            namespaces,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &MeshEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let namespace_match =
            self.namespaces.is_empty() || self.namespaces.contains(&event.namespace_id());

        topic_match && namespace_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_update(namespace_id: u64) -> MeshEvent {
        MeshEvent::MapUpdateRequested {
            namespace_id,
            namespace: "eng".to_string(),
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(map_update(1).topic(), EventTopic::MapUpdates);
        let deleted = MeshEvent::MachineDeleted {
            machine_id: 4,
            namespace_id: 1,
            hard: false,
        };
        assert_eq!(deleted.topic(), EventTopic::MachineLifecycle);
        assert_eq!(deleted.namespace_id(), 1);
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&map_update(1)));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::MapUpdates]);
        assert!(filter.matches(&map_update(1)));

        let routes = MeshEvent::RoutesEnabled {
            machine_id: 1,
            namespace_id: 1,
            routes: vec![],
        };
        assert!(!filter.matches(&routes));
    }

    #[test]
    fn test_filter_by_namespace() {
        let filter = EventFilter::for_namespaces(vec![2]);
        assert!(!filter.matches(&map_update(1)));
        assert!(filter.matches(&map_update(2)));

        let routes = |namespace_id| MeshEvent::RoutesEnabled {
            machine_id: 1,
            namespace_id,
            routes: vec!["10.0.0.0/24".to_string()],
        };
        assert!(!filter.matches(&routes(1)));
        assert!(filter.matches(&routes(2)));
    }
}
