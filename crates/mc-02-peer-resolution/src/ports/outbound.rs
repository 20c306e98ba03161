//! # Outbound Ports
//!
//! The change-event source consulted by staleness checks. Machine rows and
//! sharing grants come through the registry's own ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Most recent state change per namespace - outbound port.
#[async_trait]
pub trait ChangeEventSource: Send + Sync {
    /// Latest change across `namespaces`, or `None` if none was recorded.
    async fn last_state_change(&self, namespaces: &[String]) -> Option<DateTime<Utc>>;
}
