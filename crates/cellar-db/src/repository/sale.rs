//! # Sale Repository
//!
//! Database operations for finalized sales.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Persistence                                  │
//! │                                                                         │
//! │  A sale arrives here COMPLETE: totals computed, lines snapshotted,      │
//! │  receipt number assigned. There is no draft state and no update or      │
//! │  delete path - the table is append-only.                                │
//! │                                                                         │
//! │  insert(&sale)                                                          │
//! │    ├── BEGIN                                                            │
//! │    ├── INSERT INTO sales ...          (one row)                         │
//! │    ├── INSERT INTO sale_items ...     (one row per line, numbered)      │
//! │    └── COMMIT                                                           │
//! │                                                                         │
//! │  The transaction covers ONE sale record only. Stock decrements and      │
//! │  the audit entry are separate, later steps owned by checkout; they      │
//! │  are never rolled into this write.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use cellar_core::{Money, PaymentMethod, Sale, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// Flat sale row, joined with its items on the way out.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    receipt_number: String,
    cashier_id: String,
    cashier_name: String,
    subtotal: Money,
    tax: Money,
    total: Money,
    payment_method: PaymentMethod,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItem>) -> Sale {
        Sale {
            id: self.id,
            receipt_number: self.receipt_number,
            cashier_id: self.cashier_id,
            cashier_name: self.cashier_name,
            items,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            payment_method: self.payment_method,
            created_at: self.created_at,
        }
    }
}

const SALE_COLUMNS: &str = r#"
    id, receipt_number, cashier_id, cashier_name,
    subtotal, tax, total, payment_method, created_at
"#;

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a complete sale with its line items.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id or receipt number collision.
    ///   Treated as a hard duplicate by the caller, never an overwrite.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, receipt_number = %sale.receipt_number, "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, receipt_number, cashier_id, cashier_name,
                subtotal, tax, total, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.receipt_number)
        .bind(&sale.cashier_id)
        .bind(&sale.cashier_name)
        .bind(sale.subtotal)
        .bind(sale.tax)
        .bind(sale.total)
        .bind(sale.payment_method)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for (index, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, line_no, product_id, name,
                    quantity, unit_price, unit_cost, line_total
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&sale.id)
            .bind(index as i64 + 1)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.unit_cost)
            .bind(item.line_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets a sale by ID, items attached in rung-up order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(&row.id).await?;
                Ok(Some(row.into_sale(items)))
            }
            None => Ok(None),
        }
    }

    /// Gets a sale by receipt number (reprint path).
    pub async fn get_by_receipt_number(&self, receipt_number: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE receipt_number = ?1"
        ))
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(&row.id).await?;
                Ok(Some(row.into_sale(items)))
            }
            None => Ok(None),
        }
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Lists sales inside an inclusive instant range, oldest first.
    ///
    /// Reporting's range filter; items come along because COGS needs the
    /// captured unit costs.
    pub async fn list_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            SELECT {SALE_COLUMNS} FROM sales
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts sales whose receipt number starts with `prefix`.
    ///
    /// Checkout derives the next sequence number for a day from this count.
    /// The prefix is always a literal like `RCT-20260310-`, so no LIKE
    /// wildcard escaping is needed.
    pub async fn count_with_receipt_prefix(&self, prefix: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE receipt_number LIKE ?1")
                .bind(format!("{prefix}%"))
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Gets the line items for a sale, in rung-up order.
    async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT product_id, name, quantity, unit_price, unit_cost, line_total
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn attach_items(&self, rows: Vec<SaleRow>) -> DbResult<Vec<Sale>> {
        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.get_items(&row.id).await?;
            sales.push(row.into_sale(items));
        }
        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn sample_sale(receipt: &str, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id: Uuid::new_v4().to_string(),
            receipt_number: receipt.to_string(),
            cashier_id: "u-1".to_string(),
            cashier_name: "Grace Banda".to_string(),
            items: vec![
                SaleItem {
                    product_id: "p-gin".to_string(),
                    name: "Malawi Gin 750ml".to_string(),
                    quantity: 2,
                    unit_price: Money::from_kwacha(45_000),
                    unit_cost: Some(Money::from_kwacha(30_000)),
                    line_total: Money::from_kwacha(90_000),
                },
                SaleItem {
                    product_id: "p-coke".to_string(),
                    name: "Coca-Cola 500ml".to_string(),
                    quantity: 1,
                    unit_price: Money::from_kwacha(1_500),
                    unit_cost: None,
                    line_total: Money::from_kwacha(1_500),
                },
            ],
            subtotal: Money::from_kwacha(91_500),
            tax: Money::from_minor(1_509_750), // 16.5% of 91,500.00
            total: Money::from_minor(10_659_750),
            payment_method: PaymentMethod::AirtelMoney,
            created_at,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_sale_round_trip() {
        let db = test_db().await;
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap();
        let sale = sample_sale("RCT-20260310-0001", ts);

        db.sales().insert(&sale).await.unwrap();

        let fetched = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.receipt_number, "RCT-20260310-0001");
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.items[0].name, "Malawi Gin 750ml");
        assert_eq!(fetched.items[0].unit_cost, Some(Money::from_kwacha(30_000)));
        assert_eq!(fetched.items[1].unit_cost, None);
        assert_eq!(fetched.subtotal, sale.subtotal);
        assert_eq!(fetched.tax, sale.tax);
        assert_eq!(fetched.total, sale.total);
        assert_eq!(fetched.payment_method, PaymentMethod::AirtelMoney);
        assert_eq!(fetched.created_at, ts);
    }

    #[tokio::test]
    async fn test_duplicate_receipt_number_rejected() {
        let db = test_db().await;
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap();

        db.sales()
            .insert(&sample_sale("RCT-1", ts))
            .await
            .unwrap();

        let err = db
            .sales()
            .insert(&sample_sale("RCT-1", ts))
            .await
            .unwrap_err();
        assert!(err.is_duplicate(), "expected duplicate error, got {err}");
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected_not_overwritten() {
        let db = test_db().await;
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();

        let first = sample_sale("RCT-A", ts);
        db.sales().insert(&first).await.unwrap();

        let mut clash = sample_sale("RCT-B", ts);
        clash.id = first.id.clone();
        let err = db.sales().insert(&clash).await.unwrap_err();
        assert!(err.is_duplicate());

        // The original row is untouched
        let kept = db.sales().get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(kept.receipt_number, "RCT-A");
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_no_orphan_items() {
        let db = test_db().await;
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();

        let first = sample_sale("RCT-A", ts);
        db.sales().insert(&first).await.unwrap();

        let mut clash = sample_sale("RCT-A", ts);
        clash.items.push(clash.items[0].clone());
        db.sales().insert(&clash).await.unwrap_err();

        // Only the first sale's two lines exist
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(items, 2);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = test_db().await;

        for (n, hour) in [(1u32, 9u32), (2, 12), (3, 17)] {
            let ts = Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap();
            db.sales()
                .insert(&sample_sale(&format!("RCT-{n}"), ts))
                .await
                .unwrap();
        }

        let recent = db.sales().list_recent(2).await.unwrap();
        let receipts: Vec<&str> = recent.iter().map(|s| s.receipt_number.as_str()).collect();
        assert_eq!(receipts, vec!["RCT-3", "RCT-2"]);
    }

    #[tokio::test]
    async fn test_list_range_is_inclusive() {
        let db = test_db().await;

        let inside = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let boundary = Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 1).unwrap();

        db.sales().insert(&sample_sale("RCT-IN", inside)).await.unwrap();
        db.sales().insert(&sample_sale("RCT-EDGE", boundary)).await.unwrap();
        db.sales().insert(&sample_sale("RCT-OUT", outside)).await.unwrap();

        let start = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let sales = db.sales().list_range(start, boundary).await.unwrap();

        let receipts: Vec<&str> = sales.iter().map(|s| s.receipt_number.as_str()).collect();
        assert_eq!(receipts, vec!["RCT-IN", "RCT-EDGE"]);
    }

    #[tokio::test]
    async fn test_count_with_receipt_prefix() {
        let db = test_db().await;

        for (receipt, day) in [
            ("RCT-20260310-0001", 10),
            ("RCT-20260310-0002", 10),
            ("RCT-20260311-0001", 11),
        ] {
            let ts = Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap();
            db.sales().insert(&sample_sale(receipt, ts)).await.unwrap();
        }

        let march_tenth = db
            .sales()
            .count_with_receipt_prefix("RCT-20260310-")
            .await
            .unwrap();
        assert_eq!(march_tenth, 2);

        let empty_day = db
            .sales()
            .count_with_receipt_prefix("RCT-20260312-")
            .await
            .unwrap();
        assert_eq!(empty_day, 0);
    }

    #[tokio::test]
    async fn test_get_by_receipt_number() {
        let db = test_db().await;
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let sale = sample_sale("RCT-REPRINT", ts);
        db.sales().insert(&sale).await.unwrap();

        let fetched = db
            .sales()
            .get_by_receipt_number("RCT-REPRINT")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, sale.id);
        assert_eq!(fetched.items.len(), 2);
    }
}
