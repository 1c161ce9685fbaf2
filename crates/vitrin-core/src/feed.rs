//! Subscriber client for the order event hub.
//!
//! An [`OrderFeed`] holds one hub subscription and keeps a snapshot of the
//! order list current: every received event - whatever its payload says -
//! triggers exactly one re-fetch from the authoritative source. The pushed
//! payload is never rendered directly; `order:update` carries only an id and
//! a status, so trusting it would under-represent state. Push wakes up, pull
//! tells the truth.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::Result;
use crate::hub::EventHub;
use crate::models::Order;
use crate::store::Store;

/// Source of authoritative order state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetch the full order list, newest first.
    async fn fetch_orders(&self) -> Result<Vec<Order>>;
}

#[async_trait]
impl OrderSource for Store {
    async fn fetch_orders(&self) -> Result<Vec<Order>> {
        self.list_orders().await
    }
}

/// Live view over the order list, refreshed on every hub event.
///
/// Acquire one per consuming context and release it when that context ends;
/// teardown on any exit path returns the hub registry to its prior count.
pub struct OrderFeed {
    orders: watch::Receiver<Vec<Order>>,
    task: Option<JoinHandle<()>>,
}

impl OrderFeed {
    /// Subscribe to the hub, take an initial snapshot and start refreshing.
    ///
    /// The subscription is taken before the initial fetch so an event arriving
    /// in between is queued rather than missed.
    pub async fn spawn(hub: &EventHub, source: Arc<dyn OrderSource>) -> Self {
        let mut subscription = hub.subscribe();

        let initial = match source.fetch_orders().await {
            Ok(orders) => orders,
            Err(err) => {
                warn!(error = %err, "initial order fetch failed, starting empty");
                Vec::new()
            }
        };
        let (sender, receiver) = watch::channel(initial);

        let task = tokio::spawn(async move {
            // Events are handled one at a time, in arrival order.
            while let Some(_event) = subscription.recv().await {
                match source.fetch_orders().await {
                    Ok(orders) => {
                        if sender.send(orders).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        // Degraded, not fatal: the previous snapshot stays up.
                        warn!(error = %err, "order refresh failed, keeping previous snapshot");
                    }
                }
            }
            // Subscription drops here, releasing the hub registry slot.
        });

        Self {
            orders: receiver,
            task: Some(task),
        }
    }

    /// Current snapshot of the order list.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }

    /// Wait until the snapshot is replaced by a successful refresh.
    ///
    /// Returns `false` once the feed has shut down.
    pub async fn changed(&mut self) -> bool {
        self.orders.changed().await.is_ok()
    }

    /// Stop listening and release the hub subscription.
    ///
    /// Awaits the refresh task so the registry slot is guaranteed to be free
    /// when this returns.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for OrderFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hub::OrderEvent;
    use crate::models::status;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn order_with_status(id: &str, status: &str) -> Order {
        Order {
            id: id.to_string(),
            full_name: "Mehmet Demir".to_string(),
            phone: None,
            email: None,
            address: None,
            city: None,
            district: None,
            note: None,
            payment: None,
            subtotal: 899.0,
            shipping: 0.0,
            total: 899.0,
            status: status.to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_event_triggers_single_refetch_and_store_wins() {
        let hub = EventHub::new();

        // The store reports a different status than the pushed payload will
        // claim; the feed must end up showing the store's value.
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = Arc::clone(&calls);
        let mut source = MockOrderSource::new();
        source.expect_fetch_orders().times(2).returning(move || {
            let call = calls_in_mock.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                Ok(vec![order_with_status("SIP-1", status::NEW)])
            } else {
                Ok(vec![order_with_status("SIP-1", status::PREPARING)])
            }
        });

        let mut feed = OrderFeed::spawn(&hub, Arc::new(source)).await;
        assert_eq!(feed.orders()[0].status, "yeni");

        hub.publish(&OrderEvent::OrderUpdate {
            order_id: "SIP-1".to_string(),
            status: status::SHIPPED.to_string(),
        });

        assert!(feed.changed().await);
        // Not "kargoda" from the payload: the re-fetched value wins.
        assert_eq!(feed.orders()[0].status, "hazirlaniyor");

        feed.shutdown().await;
        // times(2) on the mock verifies exactly one re-fetch for one event.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mount_unmount_leaves_registry_unchanged() {
        let hub = EventHub::new();
        assert_eq!(hub.subscriber_count(), 0);

        for _ in 0..3 {
            let mut source = MockOrderSource::new();
            source
                .expect_fetch_orders()
                .returning(|| Ok(Vec::new()));

            let feed = OrderFeed::spawn(&hub, Arc::new(source)).await;
            assert_eq!(hub.subscriber_count(), 1);

            feed.shutdown().await;
            assert_eq!(hub.subscriber_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_snapshot() {
        let hub = EventHub::new();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = Arc::clone(&calls);
        let mut source = MockOrderSource::new();
        source.expect_fetch_orders().times(3).returning(move || {
            match calls_in_mock.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![order_with_status("SIP-1", status::NEW)]),
                1 => Err(Error::database("disk I/O error")),
                _ => Ok(vec![order_with_status("SIP-1", status::COMPLETED)]),
            }
        });

        let mut feed = OrderFeed::spawn(&hub, Arc::new(source)).await;

        // First event hits the failing fetch: snapshot must survive.
        hub.publish(&OrderEvent::OrderUpdate {
            order_id: "SIP-1".to_string(),
            status: status::SHIPPED.to_string(),
        });
        // Second event refreshes successfully.
        hub.publish(&OrderEvent::OrderUpdate {
            order_id: "SIP-1".to_string(),
            status: status::COMPLETED.to_string(),
        });

        assert!(feed.changed().await);
        assert_eq!(feed.orders()[0].status, "tamamlandi");
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        feed.shutdown().await;
    }
}
