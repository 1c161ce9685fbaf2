//! Order event hub - in-process fan-out of order events to live subscribers.
//!
//! Publishes events after order writes so that SSE endpoints and internal
//! subscribers can refresh in real time. Delivery is best-effort: no
//! persistence, no acknowledgment, no retry. Subscribers treat an event as a
//! wake-up signal and re-fetch authoritative state from the store.

mod registry;
mod types;

pub use registry::{EventHub, Subscription, SubscriptionId};
pub use types::OrderEvent;
