//! Integration tests for Vitrin
//!
//! These tests verify the pieces of vitrin-core working together:
//! - Store: SQLite persistence for products and orders
//! - EventHub: best-effort fan-out of order events
//! - OrderFeed: subscriber client refreshing from the store on every event

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use vitrin_core::models::{status, NewOrder, NewOrderItem, OrderTotals, ShippingDetails};
use vitrin_core::{EventHub, OrderEvent, OrderFeed, Store};

async fn setup_store() -> Store {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Store::new(pool);
    store.init().await.unwrap();
    store
}

fn checkout(id: &str) -> NewOrder {
    NewOrder {
        id: id.to_string(),
        items: vec![NewOrderItem {
            name: "Runner".to_string(),
            price: 1299.0,
            quantity: Some(1),
            selected_size: Some(serde_json::json!("42")),
            size: None,
        }],
        shipping: ShippingDetails {
            full_name: "Ayşe Yılmaz".to_string(),
            phone: Some("5550001122".to_string()),
            email: None,
            address: Some("Atatürk Cad. 12".to_string()),
            city: Some("İzmir".to_string()),
            district: None,
            note: None,
        },
        payment_method: Some("kapida".to_string()),
        totals: OrderTotals {
            subtotal: 1299.0,
            shipping: 49.9,
            grand_total: 1348.9,
        },
    }
}

// ============================================================================
// Checkout -> broadcast -> live refresh
// ============================================================================

#[tokio::test]
async fn test_checkout_reaches_live_feed() {
    let store = setup_store().await;
    let hub = EventHub::new();

    let mut feed = OrderFeed::spawn(&hub, Arc::new(store.clone())).await;
    assert!(feed.orders().is_empty());

    // The API layer publishes only after the store write has committed.
    let order = store.create_order(&checkout("SIP-1")).await.unwrap();
    hub.publish(&OrderEvent::OrderNew {
        order: order.clone(),
    });

    assert!(feed.changed().await);
    let snapshot = feed.orders();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "SIP-1");
    assert_eq!(snapshot[0].items.len(), 1);

    feed.shutdown().await;
}

#[tokio::test]
async fn test_feed_shows_store_truth_not_payload() {
    let store = setup_store().await;
    let hub = EventHub::new();

    store.create_order(&checkout("SIP-1")).await.unwrap();
    let mut feed = OrderFeed::spawn(&hub, Arc::new(store.clone())).await;

    store
        .update_order_status("SIP-1", status::SHIPPED)
        .await
        .unwrap();

    // Deliberately stale payload: the feed must ignore it and re-fetch.
    hub.publish(&OrderEvent::OrderUpdate {
        order_id: "SIP-1".to_string(),
        status: status::CANCELLED.to_string(),
    });

    assert!(feed.changed().await);
    assert_eq!(feed.orders()[0].status, "kargoda");

    feed.shutdown().await;
}

// ============================================================================
// Hub delivery semantics
// ============================================================================

#[tokio::test]
async fn test_broken_subscriber_never_blocks_the_rest() {
    let store = setup_store().await;
    let hub = EventHub::new();

    let mut healthy1 = hub.subscribe();
    let mut broken = hub.subscribe();
    let mut healthy2 = hub.subscribe();
    broken.close();

    let order = store.create_order(&checkout("SIP-1")).await.unwrap();
    let delivered = hub.publish(&OrderEvent::OrderNew { order });

    assert_eq!(delivered, 2);
    assert!(healthy1.recv().await.is_some());
    assert!(healthy2.recv().await.is_some());
    assert_eq!(hub.subscriber_count(), 2);
}

#[tokio::test]
async fn test_events_before_subscribe_are_lost() {
    let store = setup_store().await;
    let hub = EventHub::new();

    let order = store.create_order(&checkout("SIP-1")).await.unwrap();
    assert_eq!(hub.publish(&OrderEvent::OrderNew { order }), 0);

    // A late subscriber starts empty; no replay, the store has the history.
    let mut late = hub.subscribe();
    hub.publish(&OrderEvent::OrderUpdate {
        order_id: "SIP-1".to_string(),
        status: status::SHIPPED.to_string(),
    });
    match late.recv().await.unwrap() {
        OrderEvent::OrderUpdate { order_id, .. } => assert_eq!(order_id, "SIP-1"),
        other => panic!("unexpected event: {other:?}"),
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_repeated_feed_cycles_leave_no_leaked_connections() {
    let store = setup_store().await;
    let hub = EventHub::new();
    assert_eq!(hub.subscriber_count(), 0);

    for round in 0..5 {
        let feed = OrderFeed::spawn(&hub, Arc::new(store.clone())).await;
        assert_eq!(hub.subscriber_count(), 1, "round {round}");
        feed.shutdown().await;
        assert_eq!(hub.subscriber_count(), 0, "round {round}");
    }
}

// ============================================================================
// Dashboard aggregates
// ============================================================================

#[tokio::test]
async fn test_dashboard_reflects_order_flow() {
    let store = setup_store().await;

    store.create_order(&checkout("SIP-1")).await.unwrap();
    store.create_order(&checkout("SIP-2")).await.unwrap();
    store
        .update_order_status("SIP-2", status::COMPLETED)
        .await
        .unwrap();

    let summary = store.dashboard_summary().await.unwrap();
    assert_eq!(summary.stats.total, 2);
    assert_eq!(summary.stats.new, 1);
    assert_eq!(summary.stats.completed, 1);
    assert!((summary.stats.revenue - 2697.8).abs() < 1e-6);
}
