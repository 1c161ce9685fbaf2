//! Vitrin Core - storefront domain library
//!
//! This crate provides the core pieces of the Vitrin storefront backend:
//! - Models: product, order and dashboard types
//! - Store: persistent product/order storage on SQLite
//! - Hub: in-process order event fan-out to live subscribers
//! - Feed: subscriber client that refreshes order state on every event
//! - Error: error types shared across the workspace
//!
//! The hub is deliberately best-effort: events are wake-up hints, the store
//! remains the single source of truth. A subscriber that misses an event only
//! loses liveness, never data.

#![forbid(unsafe_code)]

pub mod error;
pub mod feed;
pub mod hub;
pub mod models;
pub mod store;

pub use error::{Error, Result};
pub use feed::{OrderFeed, OrderSource};
pub use hub::{EventHub, OrderEvent, Subscription, SubscriptionId};
pub use models::{
    DashboardSummary, NewOrder, Order, OrderItem, OrderStats, Product, ProductDraft, ProductPatch,
};
pub use store::Store;
