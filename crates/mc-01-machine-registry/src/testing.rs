//! Centralized Testing Utilities
//!
//! Test helpers shared with downstream crates. Available with the
//! `test-utils` feature flag.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use shared_types::Namespace;
use std::sync::Arc;

use crate::adapters::InMemoryStore;
use crate::application::RegistryContext;
use crate::config::RegistryConfig;
use crate::ports::outbound::{MapUpdateNotifier, TimeSource};

/// A time source that returns a settable timestamp.
///
/// # Example
///
/// ```rust,ignore
/// use mc_01_machine_registry::testing::FixedTimeSource;
/// use mc_01_machine_registry::TimeSource;
/// use chrono::Duration;
///
/// let clock = FixedTimeSource::at_unix(1_000);
/// clock.advance(Duration::seconds(5));
/// assert_eq!(clock.now().timestamp(), 1_005);
/// ```
#[derive(Debug)]
pub struct FixedTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl FixedTimeSource {
    /// Fix the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Fix the clock at a unix timestamp in seconds.
    pub fn at_unix(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Notifier that records every request.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    requests: RwLock<Vec<Namespace>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces notified so far, in order.
    pub fn requests(&self) -> Vec<Namespace> {
        self.requests.read().clone()
    }

    /// Ids of the namespaces notified so far, in order.
    pub fn namespace_ids(&self) -> Vec<u64> {
        self.requests.read().iter().map(|ns| ns.id).collect()
    }

    /// Forget recorded requests.
    pub fn clear(&self) {
        self.requests.write().clear();
    }
}

#[async_trait]
impl MapUpdateNotifier for RecordingNotifier {
    async fn request_map_update(&self, namespace: &Namespace) {
        self.requests.write().push(namespace.clone());
    }
}

/// Wiring of a registry context over one in-memory store.
pub struct TestHarness {
    /// Store backing every port.
    pub store: Arc<InMemoryStore>,
    /// Records map-update requests.
    pub notifier: Arc<RecordingNotifier>,
    /// Controllable clock.
    pub clock: Arc<FixedTimeSource>,
    /// Context handed to services.
    pub ctx: RegistryContext,
}

impl TestHarness {
    /// Harness with `RegistryConfig::for_testing()` and the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(now, RegistryConfig::for_testing())
    }

    /// Harness with an explicit configuration.
    pub fn with_config(now: DateTime<Utc>, config: RegistryConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(FixedTimeSource::new(now));
        let ctx = RegistryContext::in_memory(store.clone(), notifier.clone(), clock.clone(), config);
        Self {
            store,
            notifier,
            clock,
            ctx,
        }
    }
}

/// Hex identity key made of one repeated byte.
pub fn machine_key(byte: u8) -> String {
    shared_types::MachineKey([byte; shared_types::KEY_LEN]).hex_string()
}
