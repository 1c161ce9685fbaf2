//! Domain models for the storefront
//!
//! Wire names follow the frontend contract (camelCase), storage names are
//! snake_case columns. `sizes` and `stock_by_size` live as JSON TEXT columns
//! and are decoded on read with lenient defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order status values recognized by the dashboard.
pub mod status {
    /// Freshly placed, not yet handled
    pub const NEW: &str = "yeni";
    /// Being prepared for shipment
    pub const PREPARING: &str = "hazirlaniyor";
    /// Handed to the carrier
    pub const SHIPPED: &str = "kargoda";
    /// Delivered and closed
    pub const COMPLETED: &str = "tamamlandi";
    /// Cancelled
    pub const CANCELLED: &str = "iptal";

    /// All known statuses, in lifecycle order
    pub const ALL: [&str; 5] = [NEW, PREPARING, SHIPPED, COMPLETED, CANCELLED];

    /// Whether `value` is one of the known statuses
    #[must_use]
    pub fn is_known(value: &str) -> bool {
        ALL.contains(&value)
    }
}

/// Default shoe size run applied when a product has no explicit sizes
#[must_use]
pub fn default_sizes() -> Vec<i64> {
    (36..=46).collect()
}

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: Option<i64>,
    pub image: Option<String>,
    pub is_active: bool,
    /// Available sizes, decoded from the JSON column
    pub sizes: Vec<i64>,
    /// Remaining stock per size, decoded from the JSON column
    pub stock_by_size: BTreeMap<String, i64>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: Option<i64>,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub sizes: Option<Vec<i64>>,
    pub stock_by_size: Option<BTreeMap<String, i64>>,
}

fn default_true() -> bool {
    true
}

/// Partial product update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub discount: Option<i64>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sizes: Option<Vec<i64>>,
    pub stock_by_size: Option<BTreeMap<String, i64>>,
}

/// A placed order, including its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub note: Option<String>,
    pub payment: Option<String>,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: Option<String>,
}

/// Checkout payload for creating an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Client-assigned order id (e.g. "SIP-1693401600000")
    pub id: String,
    pub items: Vec<NewOrderItem>,
    pub shipping: ShippingDetails,
    pub payment_method: Option<String>,
    pub totals: OrderTotals,
}

/// Cart line as submitted by checkout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: Option<i64>,
    /// Size picked in the cart; the legacy field `size` is accepted too
    pub selected_size: Option<serde_json::Value>,
    pub size: Option<serde_json::Value>,
}

impl NewOrderItem {
    /// Resolve the size to store: `selectedSize` wins over `size`, numbers are
    /// stringified, empty strings collapse to none.
    #[must_use]
    pub fn resolved_size(&self) -> Option<String> {
        let raw = self.selected_size.as_ref().or(self.size.as_ref())?;
        let text = match raw {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Shipping / contact details collected at checkout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub note: Option<String>,
}

/// Checkout totals computed by the cart
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: f64,
    pub shipping: f64,
    pub grand_total: f64,
}

/// Aggregate order counters for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct OrderStats {
    pub total: i64,
    pub new: i64,
    pub completed: i64,
    pub revenue: f64,
}

/// Dashboard payload: counters, latest orders, catalog size
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: OrderStats,
    pub recent_orders: Vec<Order>,
    pub products: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes_run() {
        let sizes = default_sizes();
        assert_eq!(sizes.len(), 11);
        assert_eq!(sizes.first(), Some(&36));
        assert_eq!(sizes.last(), Some(&46));
    }

    #[test]
    fn test_status_is_known() {
        assert!(status::is_known("yeni"));
        assert!(status::is_known("kargoda"));
        assert!(!status::is_known("gönderildi"));
        assert!(!status::is_known(""));
    }

    #[test]
    fn test_product_wire_names() {
        let product = Product {
            id: 1,
            name: "Runner".to_string(),
            brand: None,
            category: None,
            description: None,
            price: 1299.0,
            original_price: Some(1499.0),
            discount: None,
            image: None,
            is_active: true,
            sizes: default_sizes(),
            stock_by_size: BTreeMap::from([("42".to_string(), 3)]),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("originalPrice").is_some());
        assert!(json.get("stockBySize").is_some());
        assert!(json.get("isActive").is_some());
        assert!(json.get("original_price").is_none());
    }

    #[test]
    fn test_new_order_item_size_resolution() {
        let item: NewOrderItem = serde_json::from_str(
            r#"{"name":"Runner","price":1299,"selectedSize":42,"size":"41"}"#,
        )
        .unwrap();
        assert_eq!(item.resolved_size().as_deref(), Some("42"));

        let item: NewOrderItem =
            serde_json::from_str(r#"{"name":"Runner","price":1299,"size":""}"#).unwrap();
        assert_eq!(item.resolved_size(), None);

        let item: NewOrderItem =
            serde_json::from_str(r#"{"name":"Runner","price":1299}"#).unwrap();
        assert_eq!(item.resolved_size(), None);
    }

    #[test]
    fn test_new_order_deserializes_checkout_shape() {
        let body = r#"{
            "id": "SIP-1",
            "items": [{"name": "Runner", "price": 1299.0, "quantity": 2, "selectedSize": "43"}],
            "shipping": {"fullName": "Ayşe Yılmaz", "phone": "5550001122", "city": "İzmir"},
            "paymentMethod": "kapida",
            "totals": {"subtotal": 2598.0, "shipping": 49.9, "grandTotal": 2647.9}
        }"#;
        let order: NewOrder = serde_json::from_str(body).unwrap();
        assert_eq!(order.id, "SIP-1");
        assert_eq!(order.shipping.full_name, "Ayşe Yılmaz");
        assert_eq!(order.totals.grand_total, 2647.9);
        assert_eq!(order.items[0].resolved_size().as_deref(), Some("43"));
    }
}
