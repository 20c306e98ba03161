//! # Event Subscriber
//!
//! Receiving side of the bus. A long-poll session holds one `Subscription`
//! per connected machine, filtered to the namespaces that machine can see,
//! and waits on it between keep-alives.

use crate::events::{EventFilter, MeshEvent};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Filtered receiver of bus events.
///
/// A subscriber that lags behind the bus skips what it missed: a skipped map
/// update is covered by the next one, or by the staleness check.
pub struct Subscription {
    receiver: broadcast::Receiver<MeshEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<MeshEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Wait for the next accepted event. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<MeshEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Wait at most `keep_alive` for the next accepted event.
    ///
    /// `Ok(None)` means the wait timed out and the session should send a
    /// keep-alive instead.
    pub async fn recv_within(
        &mut self,
        keep_alive: Duration,
    ) -> Result<Option<MeshEvent>, SubscriptionError> {
        match tokio::time::timeout(keep_alive, self.recv()).await {
            Ok(Some(event)) => Ok(Some(event)),
            Ok(None) => Err(SubscriptionError::Closed),
            Err(_) => Ok(None),
        }
    }

    /// The next accepted event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<MeshEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Replace the watched namespaces, e.g. after a sharing change widened
    /// what the machine can see. Buffered events are filtered anew.
    pub fn watch_namespaces(&mut self, namespaces: Vec<u64>) {
        self.filter.namespaces = namespaces;
    }

    /// The current filter.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

/// Filtered bus events as a `Stream`.
pub struct EventStream {
    inner: BroadcastStream<MeshEvent>,
    filter: EventFilter,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<MeshEvent>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    /// The stream's filter. Named apart from `StreamExt::filter`.
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = MeshEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(event)) if self.filter.matches(&event) => return Poll::Ready(Some(event)),
                Some(Ok(_)) => {}
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    debug!(skipped, "Event stream lagged");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
