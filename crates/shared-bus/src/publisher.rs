//! # Event Publisher
//!
//! Publishing side of the bus. Mutating services hold an
//! `Arc<dyn EventPublisher>`; the control server owns the concrete bus and
//! hands out subscriptions to its poll sessions.

use crate::events::{EventFilter, MeshEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sink for coordination events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event` to every current subscriber.
    ///
    /// An event nobody is listening for is dropped, not queued. Returns the
    /// number of subscribers the event reached before filtering.
    async fn publish(&self, event: MeshEvent) -> usize;

    /// Events published since creation, delivered or not.
    fn events_published(&self) -> u64;
}

/// Single-process bus over a `tokio::sync::broadcast` channel.
///
/// Each subscriber buffers at most `capacity` events; a subscriber that
/// falls further behind skips the oldest ones.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<MeshEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with `DEFAULT_CHANNEL_CAPACITY`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events accepted by `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, namespaces = ?filter.namespaces, "Subscribed");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Subscribe as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Live subscriptions and streams.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: MeshEvent) -> usize {
        let topic = event.topic();
        let namespace = event.namespace_id();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, namespace, receivers, "Event published");
                receivers
            }
            Err(_) => {
                trace!(?topic, namespace, "No subscribers, event dropped");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
