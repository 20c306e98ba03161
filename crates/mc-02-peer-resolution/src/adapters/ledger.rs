//! State Change Ledger
//!
//! Remembers when each namespace last changed. As a `MapUpdateNotifier` it
//! stamps the namespace with the current time; as a `ChangeEventSource` it
//! answers with the newest stamp across the asked namespaces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mc_01_machine_registry::{MapUpdateNotifier, TimeSource};
use parking_lot::RwLock;
use shared_types::Namespace;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use crate::ports::outbound::ChangeEventSource;

/// Last change time per namespace name.
pub struct StateChangeLedger {
    changes: RwLock<HashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn TimeSource>,
}

impl StateChangeLedger {
    /// Create an empty ledger stamping with `clock`.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            changes: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Record a change of `namespace` at `at`. Older stamps never win.
    pub fn record(&self, namespace: &str, at: DateTime<Utc>) {
        let mut changes = self.changes.write();
        let entry = changes.entry(namespace.to_string()).or_insert(at);
        if at > *entry {
            *entry = at;
        }
    }

    /// Last change of one namespace.
    pub fn last_change_of(&self, namespace: &str) -> Option<DateTime<Utc>> {
        self.changes.read().get(namespace).copied()
    }
}

#[async_trait]
impl MapUpdateNotifier for StateChangeLedger {
    async fn request_map_update(&self, namespace: &Namespace) {
        let now = self.clock.now();
        trace!(namespace = %namespace.name, at = %now, "Recording state change");
        self.record(&namespace.name, now);
    }
}

#[async_trait]
impl ChangeEventSource for StateChangeLedger {
    async fn last_state_change(&self, namespaces: &[String]) -> Option<DateTime<Utc>> {
        let changes = self.changes.read();
        namespaces.iter().filter_map(|ns| changes.get(ns)).max().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mc_01_machine_registry::testing::FixedTimeSource;

    #[tokio::test]
    async fn test_notifier_stamps_clock_time() {
        let clock = Arc::new(FixedTimeSource::at_unix(1_000));
        let ledger = StateChangeLedger::new(clock.clone());

        ledger
            .request_map_update(&Namespace::new(1, "eng", clock.now()))
            .await;
        assert_eq!(ledger.last_change_of("eng"), Some(clock.now()));
    }

    #[tokio::test]
    async fn test_max_across_namespaces() {
        let clock = Arc::new(FixedTimeSource::at_unix(1_000));
        let ledger = StateChangeLedger::new(clock.clone());
        let t = clock.now();
        ledger.record("eng", t);
        ledger.record("ops", t + Duration::seconds(30));

        let names = vec!["eng".to_string(), "ops".to_string(), "lab".to_string()];
        assert_eq!(
            ledger.last_state_change(&names).await,
            Some(t + Duration::seconds(30))
        );
        assert_eq!(ledger.last_state_change(&["lab".to_string()]).await, None);
    }

    #[test]
    fn test_record_keeps_newest() {
        let clock = Arc::new(FixedTimeSource::at_unix(1_000));
        let ledger = StateChangeLedger::new(clock.clone());
        let t = clock.now();
        ledger.record("eng", t);
        ledger.record("eng", t - Duration::seconds(5));
        assert_eq!(ledger.last_change_of("eng"), Some(t));
    }
}
