//! Web API module for Vitrin
//!
//! Provides REST endpoints for:
//! - Product catalog (public read, admin write)
//! - Orders (public checkout, admin status updates)
//! - Dashboard aggregates
//! - Live order event stream (SSE)

pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod stream;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use serde_json::json;
use vitrin_core::Error;

pub use dashboard::dashboard_routes;
pub use health::health_routes;
pub use orders::orders_routes;
pub use products::products_routes;
pub use stream::stream_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(health_routes())
        .merge(products_routes())
        .merge(orders_routes())
        .merge(dashboard_routes())
        .merge(stream_routes())
}

/// Wrapper mapping core errors onto HTTP responses.
///
/// Bodies keep the original `{ "error": "<message>" }` contract, including
/// the Turkish not-found messages the frontend matches on.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::ProductNotFound(_) | Error::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) | Error::UnknownStatus(_) | Error::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, code = self.0.code(), "request failed");
        }

        let message = match &self.0 {
            Error::ProductNotFound(_) => "Ürün bulunamadı".to_string(),
            Error::OrderNotFound(_) => "Sipariş bulunamadı".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
