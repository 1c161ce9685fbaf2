//! Admin dashboard endpoint
//!
//! GET /api/dashboard - Order counters, recent orders and catalog size (admin)

use axum::routing::get;
use axum::{Extension, Json, Router};

use vitrin_core::{DashboardSummary, Store};

use super::ApiError;
use crate::middleware::auth::RequireAdmin;

/// Aggregates for the admin dashboard
async fn dashboard(
    _admin: RequireAdmin,
    Extension(store): Extension<Store>,
) -> Result<Json<DashboardSummary>, ApiError> {
    Ok(Json(store.dashboard_summary().await?))
}

/// Create dashboard routes
pub fn dashboard_routes() -> Router {
    Router::new().route("/api/dashboard", get(dashboard))
}
