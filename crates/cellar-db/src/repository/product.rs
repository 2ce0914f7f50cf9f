//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! Every write drops the fresh catalog snapshot, so the next
//! [`Database::catalog`](crate::pool::Database::catalog) read refetches.
//! Callers never invalidate by hand.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  Absolute writes come only from the inventory screen (upsert).         │
//! │  Sales and restocks apply DELTAS, clamped at zero in SQL:              │
//! │                                                                         │
//! │     UPDATE products SET stock = MAX(stock + delta, 0)                  │
//! │                                                                         │
//! │  The clamp keeps the "never negative" invariant even when the shelf    │
//! │  count and the database disagree (damaged bottles, miscounts). An       │
//! │  oversold decrement lands on zero instead of corrupting the column.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::cache::SnapshotCache;
use crate::error::{DbError, DbResult};
use cellar_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_barcode("6001234567890").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    catalog_cache: SnapshotCache<Vec<Product>>,
}

const PRODUCT_COLUMNS: &str = r#"
    id, name, category, price, cost, stock, barcode,
    low_stock_threshold, expires_on, supplier, image_ref,
    created_at, updated_at
"#;

impl ProductRepository {
    /// Creates a new ProductRepository sharing the catalog cache.
    pub fn new(pool: SqlitePool, catalog_cache: SnapshotCache<Vec<Product>>) -> Self {
        ProductRepository {
            pool,
            catalog_cache,
        }
    }

    /// Lists the whole catalog, sorted by name.
    ///
    /// The catalog is small enough (a few hundred bottles) that the
    /// register caches it whole; filtering by category or search text
    /// happens in memory.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by barcode (scanner path on the register).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1 AND barcode <> ''"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Products at or below their low-stock threshold, emptiest first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE stock <= low_stock_threshold
            ORDER BY stock ASC, name
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Products expiring strictly before the cutoff, soonest first.
    ///
    /// Products without an expiry date never appear.
    pub async fn list_expiring_before(&self, cutoff: NaiveDate) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE expires_on IS NOT NULL AND expires_on < ?1
            ORDER BY expires_on ASC, name
            "#
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id taken, or barcode already in
    ///   the catalog
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, price, cost, stock, barcode,
                low_stock_threshold, expires_on, supplier, image_ref,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.stock)
        .bind(&product.barcode)
        .bind(product.low_stock_threshold)
        .bind(product.expires_on)
        .bind(&product.supplier)
        .bind(&product.image_ref)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        self.catalog_cache.invalidate();

        Ok(())
    }

    /// Inserts or replaces a product by id, stamping `updated_at`.
    ///
    /// The edit path: an unknown id creates the row, a known id replaces
    /// every editable column and leaves `created_at` alone.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode taken by another product
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Upserting product");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, price, cost, stock, barcode,
                low_stock_threshold, expires_on, supplier, image_ref,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                price = excluded.price,
                cost = excluded.cost,
                stock = excluded.stock,
                barcode = excluded.barcode,
                low_stock_threshold = excluded.low_stock_threshold,
                expires_on = excluded.expires_on,
                supplier = excluded.supplier,
                image_ref = excluded.image_ref,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.stock)
        .bind(&product.barcode)
        .bind(product.low_stock_threshold)
        .bind(product.expires_on)
        .bind(&product.supplier)
        .bind(&product.image_ref)
        .bind(product.created_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.catalog_cache.invalidate();

        Ok(())
    }

    /// Applies a stock delta, clamped so the level never goes below zero.
    ///
    /// ## Arguments
    /// * `delta` - positive for restocking, negative for corrections
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = MAX(stock + ?2, 0), updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.catalog_cache.invalidate();

        Ok(())
    }

    /// Decrements stock for one sold line, clamped at zero.
    ///
    /// Checkout calls this once per line after the sale record is safely
    /// written. A miss (product deleted mid-sale) is reported so the
    /// caller can log it and carry on with the remaining lines.
    pub async fn decrement_for_sale(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock for sale");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = MAX(stock - ?2, 0), updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.catalog_cache.invalidate();

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Safe because sale lines snapshot everything they need; historical
    /// reports for a deleted product fall back to a zero cost.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.catalog_cache.invalidate();

        Ok(())
    }

    /// Counts catalog entries (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
