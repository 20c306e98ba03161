//! # Shared Bus - Map Update Propagation
//!
//! Carries "peer-visible state changed" signals from the mutating paths of the
//! coordination core (registration, deletion, route changes) to whatever holds
//! the connected machines' long-poll sessions.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Machine Registry │                    │ Poll sessions    │
//! │ Route Authority  │    publish()       │ (one per machine)│
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! Delivery is best effort. The staleness check is what guarantees a machine
//! eventually receives a fresh map; the bus only makes it prompt.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, MeshEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Events buffered per subscriber before it starts skipping.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
