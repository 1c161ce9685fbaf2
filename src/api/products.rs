//! Product catalog endpoints
//!
//! GET    /api/products     - List products (public)
//! POST   /api/products     - Create a product (admin)
//! PUT    /api/products/:id - Update a product (admin)
//! DELETE /api/products/:id - Delete a product (admin)

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};

use vitrin_core::{Product, ProductDraft, ProductPatch, Store};

use super::ApiError;
use crate::middleware::auth::RequireAdmin;

/// List all products, newest first
async fn list_products(
    Extension(store): Extension<Store>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(store.list_products().await?))
}

/// Create a new product
async fn create_product(
    _admin: RequireAdmin,
    Extension(store): Extension<Store>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = store.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product
async fn update_product(
    _admin: RequireAdmin,
    Extension(store): Extension<Store>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(store.update_product(id, patch).await?))
}

/// Delete a product
async fn delete_product(
    _admin: RequireAdmin,
    Extension(store): Extension<Store>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    store.delete_product(id).await?;
    Ok(Json(json!({ "message": "Ürün silindi" })))
}

/// Create product routes
pub fn products_routes() -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            put(update_product).delete(delete_product),
        )
}
