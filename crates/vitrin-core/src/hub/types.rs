use serde_json::{json, Value};

use crate::models::Order;

/// Events emitted after order writes commit.
///
/// Payload shapes are part of the wire contract with the dashboard and are
/// intentionally asymmetric: `order:new` carries the full order, `order:update`
/// only the id and the new status. Subscribers must not treat either payload
/// as authoritative - the store is re-queried on receipt.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// An order was created
    OrderNew {
        /// The order as persisted, including items
        order: Order,
    },
    /// An order's status changed
    OrderUpdate {
        /// Order identifier
        order_id: String,
        /// New status value
        status: String,
    },
}

impl OrderEvent {
    /// Wire event name as sent on the SSE channel
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderNew { .. } => "order:new",
            Self::OrderUpdate { .. } => "order:update",
        }
    }

    /// JSON payload as sent on the SSE channel
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::OrderNew { order } => json!({ "order": order }),
            Self::OrderUpdate { order_id, status } => {
                json!({ "orderId": order_id, "status": status })
            }
        }
    }
}
