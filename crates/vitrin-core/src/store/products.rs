//! Product catalog queries.
//!
//! `sizes` and `stock_by_size` are JSON TEXT columns. Reads are lenient: a
//! NULL or unparseable value falls back to the default size run / empty stock
//! instead of failing the listing.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::BTreeMap;

use super::Store;
use crate::error::{Error, Result};
use crate::models::{default_sizes, Product, ProductDraft, ProductPatch};

fn product_from_row(row: &SqliteRow) -> Product {
    let sizes_json: Option<String> = row.get("sizes");
    let stock_json: Option<String> = row.get("stock_by_size");
    let created_at: String = row.get("created_at");

    let sizes = sizes_json
        .and_then(|raw| serde_json::from_str::<Vec<i64>>(&raw).ok())
        .unwrap_or_else(default_sizes);
    let stock_by_size = stock_json
        .and_then(|raw| serde_json::from_str::<BTreeMap<String, i64>>(&raw).ok())
        .unwrap_or_default();

    Product {
        id: row.get("id"),
        name: row.get("name"),
        brand: row.get("brand"),
        category: row.get("category"),
        description: row.get("description"),
        price: row.get("price"),
        original_price: row.get("original_price"),
        discount: row.get("discount"),
        image: row.get("image"),
        is_active: row.get("is_active"),
        sizes,
        stock_by_size,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    }
}

impl Store {
    /// List all products, newest first
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, brand, category, description, price, original_price,
                   discount, image, is_active, sizes, stock_by_size, created_at
            FROM products
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Fetch one product by id
    pub async fn get_product(&self, id: i64) -> Result<Product> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, category, description, price, original_price,
                   discount, image, is_active, sizes, stock_by_size, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| product_from_row(&row))
            .ok_or(Error::ProductNotFound(id))
    }

    /// Create a product; missing sizes/stock get the catalog defaults
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        let sizes = draft.sizes.unwrap_or_else(default_sizes);
        let stock_by_size = draft.stock_by_size.unwrap_or_default();
        let sizes_json = serde_json::to_string(&sizes)?;
        let stock_json = serde_json::to_string(&stock_by_size)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products
            (name, brand, category, description, price, original_price,
             discount, image, is_active, sizes, stock_by_size, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.brand)
        .bind(&draft.category)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.original_price)
        .bind(draft.discount)
        .bind(&draft.image)
        .bind(draft.is_active)
        .bind(&sizes_json)
        .bind(&stock_json)
        .bind(created_at.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: draft.name,
            brand: draft.brand,
            category: draft.category,
            description: draft.description,
            price: draft.price,
            original_price: draft.original_price,
            discount: draft.discount,
            image: draft.image,
            is_active: draft.is_active,
            sizes,
            stock_by_size,
            created_at,
        })
    }

    /// Apply a partial update; absent fields keep their stored value
    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(brand) = patch.brand {
            product.brand = Some(brand);
        }
        if let Some(category) = patch.category {
            product.category = Some(category);
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(original_price) = patch.original_price {
            product.original_price = Some(original_price);
        }
        if let Some(discount) = patch.discount {
            product.discount = Some(discount);
        }
        if let Some(image) = patch.image {
            product.image = Some(image);
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = is_active;
        }
        if let Some(sizes) = patch.sizes {
            product.sizes = sizes;
        }
        if let Some(stock_by_size) = patch.stock_by_size {
            product.stock_by_size = stock_by_size;
        }

        let sizes_json = serde_json::to_string(&product.sizes)?;
        let stock_json = serde_json::to_string(&product.stock_by_size)?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, brand = ?, category = ?, description = ?, price = ?,
                original_price = ?, discount = ?, image = ?, is_active = ?,
                sizes = ?, stock_by_size = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.discount)
        .bind(&product.image)
        .bind(product.is_active)
        .bind(&sizes_json)
        .bind(&stock_json)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(product)
    }

    /// Delete a product
    pub async fn delete_product(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProductNotFound(id));
        }
        Ok(())
    }

    /// Number of products in the catalog
    pub async fn count_products(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM products")
            .fetch_one(self.pool())
            .await?;
        Ok(row.get("n"))
    }
}
