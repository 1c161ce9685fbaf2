use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use super::types::OrderEvent;

/// Opaque handle identifying one registered subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Default)]
struct Registry {
    connections: Mutex<HashMap<u64, mpsc::UnboundedSender<OrderEvent>>>,
    next_id: AtomicU64,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<OrderEvent>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) {
        // Idempotent: removing an unknown or already-removed id is a no-op.
        self.lock().remove(&id);
    }
}

/// Registry of open subscriber connections with fire-and-forget broadcast.
///
/// Owned by whoever starts the serving endpoint and injected where needed;
/// clones share the same registry. Lives for the whole process: created at
/// startup, dropped at shutdown.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    registry: Arc<Registry>,
}

impl EventHub {
    /// Create a hub with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber connection.
    ///
    /// The returned [`Subscription`] is the connection's receiving half; it
    /// unregisters itself when dropped, so a subscriber that goes away on any
    /// path (disconnect, error, teardown) cannot leak a registry slot.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        self.registry.lock().insert(id, sender);
        debug!(subscription = id, "subscriber registered");
        Subscription {
            id: SubscriptionId(id),
            receiver,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Remove a connection from the registry.
    ///
    /// Unsubscribing an unknown or already-removed handle is a no-op, never
    /// an error.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.registry.remove(id.0);
    }

    /// Deliver an event to every currently registered connection.
    ///
    /// Fan-out iterates a point-in-time snapshot of the membership, so a
    /// subscribe or unsubscribe racing with an in-flight publish cannot
    /// invalidate the iteration. A connection whose receiving half is gone is
    /// skipped and pruned; its failure never aborts delivery to the others
    /// and never surfaces to the caller. With no subscribers the event is
    /// silently dropped.
    ///
    /// Returns the number of connections the event was written to.
    pub fn publish(&self, event: &OrderEvent) -> usize {
        let snapshot: Vec<(u64, mpsc::UnboundedSender<OrderEvent>)> = self
            .registry
            .lock()
            .iter()
            .map(|(id, sender)| (*id, sender.clone()))
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in snapshot {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut connections = self.registry.lock();
            for id in dead {
                connections.remove(&id);
            }
        }

        delivered
    }

    /// Current number of registered connections.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

/// Receiving half of one subscriber connection.
///
/// State machine per connection is OPEN -> CLOSED, terminal: dropping the
/// subscription (or calling [`EventHub::unsubscribe`] with its id) closes it
/// for good.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<OrderEvent>,
    registry: Arc<Registry>,
}

impl Subscription {
    /// Handle for explicit unsubscription.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Receive the next event, or `None` once the connection is closed.
    pub async fn recv(&mut self) -> Option<OrderEvent> {
        self.receiver.recv().await
    }

    /// Close the receiving half without unregistering.
    ///
    /// After this, writes to the connection fail fast; the registry entry is
    /// pruned on the next publish or when the subscription is dropped.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl Stream for Subscription {
    type Item = OrderEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id.0);
        debug!(subscription = self.id.0, "subscriber unregistered");
    }
}
