//! # Expense Repository
//!
//! Database operations for operating expenses.
//!
//! Expenses are dated by the day they were incurred (`incurred_on`, a
//! calendar date) rather than the instant they were typed in. Range
//! queries filter on that date so a receipt entered on Monday for
//! Saturday's generator fuel lands in the right week.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cellar_core::Expense;

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

const EXPENSE_COLUMNS: &str = r#"
    id, incurred_on, category, description, amount,
    recorded_by_id, recorded_by_name, created_at
"#;

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts a new expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(id = %expense.id, category = %expense.category, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, incurred_on, category, description, amount,
                recorded_by_id, recorded_by_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&expense.id)
        .bind(expense.incurred_on)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.recorded_by_id)
        .bind(&expense.recorded_by_name)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists the most recently incurred expenses.
    ///
    /// Ordered by incurred day, newest first; ties broken by entry time so
    /// several same-day receipts keep a stable order.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS} FROM expenses
            ORDER BY incurred_on DESC, created_at DESC
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Lists expenses incurred inside an inclusive day range, oldest first.
    pub async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS} FROM expenses
            WHERE incurred_on >= ?1 AND incurred_on <= ?2
            ORDER BY incurred_on ASC, created_at ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Deletes an expense (mistyped entry correction).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no expense with that ID
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }

    /// Counts all expenses.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cellar_core::Money;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_expense(day: NaiveDate, category: &str, kwacha: i64) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            incurred_on: day,
            category: category.to_string(),
            description: format!("{category} for the week"),
            amount: Money::from_kwacha(kwacha),
            recorded_by_id: "u-1".to_string(),
            recorded_by_name: "Grace Banda".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_expense_round_trip() {
        let db = test_db().await;
        let expense = sample_expense(day(2026, 3, 7), "Generator fuel", 18_000);

        db.expenses().insert(&expense).await.unwrap();

        let fetched = db.expenses().get_by_id(&expense.id).await.unwrap().unwrap();
        assert_eq!(fetched.incurred_on, day(2026, 3, 7));
        assert_eq!(fetched.category, "Generator fuel");
        assert_eq!(fetched.amount, Money::from_kwacha(18_000));
        assert_eq!(fetched.recorded_by_name, "Grace Banda");
    }

    #[tokio::test]
    async fn test_list_range_filters_on_incurred_day() {
        let db = test_db().await;

        db.expenses()
            .insert(&sample_expense(day(2026, 2, 28), "Rent", 250_000))
            .await
            .unwrap();
        db.expenses()
            .insert(&sample_expense(day(2026, 3, 1), "Electricity", 40_000))
            .await
            .unwrap();
        db.expenses()
            .insert(&sample_expense(day(2026, 3, 31), "Transport", 12_000))
            .await
            .unwrap();
        db.expenses()
            .insert(&sample_expense(day(2026, 4, 1), "Rent", 250_000))
            .await
            .unwrap();

        let march = db
            .expenses()
            .list_range(day(2026, 3, 1), day(2026, 3, 31))
            .await
            .unwrap();

        let categories: Vec<&str> = march.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Electricity", "Transport"]);
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_day() {
        let db = test_db().await;

        db.expenses()
            .insert(&sample_expense(day(2026, 3, 3), "Airtime", 5_000))
            .await
            .unwrap();
        db.expenses()
            .insert(&sample_expense(day(2026, 3, 9), "Ice", 8_000))
            .await
            .unwrap();
        db.expenses()
            .insert(&sample_expense(day(2026, 3, 6), "Cleaning", 10_000))
            .await
            .unwrap();

        let recent = db.expenses().list_recent(2).await.unwrap();
        let categories: Vec<&str> = recent.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Ice", "Cleaning"]);
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let db = test_db().await;
        let expense = sample_expense(day(2026, 3, 7), "Generator fuel", 18_000);
        db.expenses().insert(&expense).await.unwrap();

        db.expenses().delete(&expense.id).await.unwrap();
        assert!(db.expenses().get_by_id(&expense.id).await.unwrap().is_none());

        let err = db.expenses().delete(&expense.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
