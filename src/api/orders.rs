//! Order endpoints
//!
//! GET  /api/orders     - List orders with items (public)
//! GET  /api/orders/:id - Get one order (public)
//! POST /api/orders     - Checkout: create an order (public)
//! PUT  /api/orders/:id - Update order status (admin)
//!
//! Both writes publish on the event hub, strictly after the store write has
//! returned: `order:new` with the full order, `order:update` with only the id
//! and the new status. A failed write never publishes.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::info;

use vitrin_core::{EventHub, NewOrder, Order, OrderEvent, Store};

use super::ApiError;
use crate::middleware::auth::RequireAdmin;

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

/// List all orders, newest first
async fn list_orders(Extension(store): Extension<Store>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(store.list_orders().await?))
}

/// Get one order with its items
async fn get_order(
    Extension(store): Extension<Store>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(store.get_order(&id).await?))
}

/// Create an order from a checkout payload
async fn create_order(
    Extension(store): Extension<Store>,
    Extension(hub): Extension<EventHub>,
    Json(new): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = store.create_order(&new).await?;

    let delivered = hub.publish(&OrderEvent::OrderNew {
        order: order.clone(),
    });
    info!(order_id = %order.id, subscribers = delivered, "order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Change an order's status
async fn update_order(
    _admin: RequireAdmin,
    Extension(store): Extension<Store>,
    Extension(hub): Extension<EventHub>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let order = store.update_order_status(&id, &request.status).await?;

    let delivered = hub.publish(&OrderEvent::OrderUpdate {
        order_id: order.id.clone(),
        status: order.status.clone(),
    });
    info!(order_id = %order.id, status = %order.status, subscribers = delivered, "order updated");

    Ok(Json(order))
}

/// Create order routes
pub fn orders_routes() -> Router {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/:id", get(get_order).put(update_order))
}
