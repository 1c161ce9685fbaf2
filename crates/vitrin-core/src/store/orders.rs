//! Order queries.
//!
//! Orders are written together with their line items in one transaction; the
//! order id is assigned by the checkout client (e.g. "SIP-1693401600000").

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

use super::Store;
use crate::error::{Error, Result};
use crate::models::{status, DashboardSummary, NewOrder, Order, OrderItem, OrderStats};

const ORDER_COLUMNS: &str = "id, full_name, phone, email, address, city, district, note, \
                             payment, subtotal, shipping, total, status, created_at";

fn order_from_row(row: &SqliteRow) -> Order {
    let created_at: String = row.get("created_at");
    Order {
        id: row.get("id"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        city: row.get("city"),
        district: row.get("district"),
        note: row.get("note"),
        payment: row.get("payment"),
        subtotal: row.get("subtotal"),
        shipping: row.get("shipping"),
        total: row.get("total"),
        status: row.get("status"),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        items: Vec::new(),
    }
}

fn item_from_row(row: &SqliteRow) -> OrderItem {
    OrderItem {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        quantity: row.get("quantity"),
        size: row.get("size"),
    }
}

impl Store {
    /// List all orders with their items, newest first
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        let mut orders: Vec<Order> = rows.iter().map(order_from_row).collect();

        let item_rows = sqlx::query(
            "SELECT id, order_id, name, price, quantity, size FROM order_items ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        let mut items_by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let order_id: String = row.get("order_id");
            items_by_order
                .entry(order_id)
                .or_default()
                .push(item_from_row(row));
        }

        for order in &mut orders {
            if let Some(items) = items_by_order.remove(&order.id) {
                order.items = items;
            }
        }
        Ok(orders)
    }

    /// Fetch one order with its items
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        let mut order = row
            .map(|row| order_from_row(&row))
            .ok_or_else(|| Error::OrderNotFound(id.to_string()))?;

        let item_rows = sqlx::query(
            "SELECT id, name, price, quantity, size FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;
        order.items = item_rows.iter().map(item_from_row).collect();
        Ok(order)
    }

    /// Create an order and its items in one transaction.
    ///
    /// Returns the order as persisted; the caller publishes the `order:new`
    /// event only after this commits.
    pub async fn create_order(&self, new: &NewOrder) -> Result<Order> {
        if new.id.trim().is_empty() {
            return Err(Error::validation("order id is required"));
        }

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders
            (id, full_name, phone, email, address, city, district, note,
             payment, subtotal, shipping, total, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.id)
        .bind(&new.shipping.full_name)
        .bind(&new.shipping.phone)
        .bind(&new.shipping.email)
        .bind(&new.shipping.address)
        .bind(&new.shipping.city)
        .bind(&new.shipping.district)
        .bind(&new.shipping.note)
        .bind(&new.payment_method)
        .bind(new.totals.subtotal)
        .bind(new.totals.shipping)
        .bind(new.totals.grand_total)
        .bind(status::NEW)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, name, price, quantity, size)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&new.id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity.unwrap_or(1))
            .bind(item.resolved_size())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.get_order(&new.id).await
    }

    /// Change an order's status.
    ///
    /// The new value must be one of the known statuses; the caller publishes
    /// the `order:update` event only after this returns.
    pub async fn update_order_status(&self, id: &str, new_status: &str) -> Result<Order> {
        if !status::is_known(new_status) {
            return Err(Error::UnknownStatus(new_status.to_string()));
        }

        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(new_status)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::OrderNotFound(id.to_string()));
        }
        self.get_order(id).await
    }

    /// Aggregates for the admin dashboard
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS new_count,
                   COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS completed_count,
                   COALESCE(SUM(total), 0.0) AS revenue
            FROM orders
            "#,
        )
        .bind(status::NEW)
        .bind(status::COMPLETED)
        .fetch_one(self.pool())
        .await?;

        let stats = OrderStats {
            total: row.get("total"),
            new: row.get("new_count"),
            completed: row.get("completed_count"),
            revenue: row.get("revenue"),
        };

        let recent_rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT 5"
        ))
        .fetch_all(self.pool())
        .await?;
        let mut recent_orders: Vec<Order> = recent_rows.iter().map(order_from_row).collect();
        for order in &mut recent_orders {
            let item_rows = sqlx::query(
                "SELECT id, name, price, quantity, size FROM order_items WHERE order_id = ? ORDER BY id",
            )
            .bind(&order.id)
            .fetch_all(self.pool())
            .await?;
            order.items = item_rows.iter().map(item_from_row).collect();
        }

        Ok(DashboardSummary {
            stats,
            recent_orders,
            products: self.count_products().await?,
        })
    }
}
