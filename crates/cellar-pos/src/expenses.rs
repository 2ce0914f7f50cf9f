//! # Expenses
//!
//! Operating costs entered by hand: rent, transport, generator fuel,
//! stock purchases. Reporting subtracts them from gross profit; nothing
//! else reads them.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::audit;
use crate::error::PosError;
use cellar_core::validation::{
    validate_expense_amount, validate_expense_category, validate_expense_description,
};
use cellar_core::{Expense, Money, Severity, User, DEFAULT_RECENT_LIMIT};
use cellar_db::Database;

/// New expense entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Day the cost was incurred, which is what reports group by; the
    /// entry instant is recorded separately.
    pub incurred_on: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: Money,
}

/// Expense book service.
#[derive(Clone)]
pub struct ExpenseService {
    db: Database,
}

impl ExpenseService {
    /// Creates a new expense service.
    pub fn new(db: Database) -> Self {
        ExpenseService { db }
    }

    /// Records an expense.
    pub async fn record(&self, new: NewExpense, recorder: &User) -> Result<Expense, PosError> {
        validate_expense_category(&new.category)?;
        validate_expense_description(&new.description)?;
        validate_expense_amount(new.amount)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            incurred_on: new.incurred_on,
            category: new.category.trim().to_string(),
            description: new.description.trim().to_string(),
            amount: new.amount,
            recorded_by_id: recorder.id.clone(),
            recorded_by_name: recorder.display_name.clone(),
            created_at: Utc::now(),
        };

        self.db.expenses().insert(&expense).await?;

        audit::record(
            &self.db,
            audit::entry(
                &recorder.display_name,
                "expense.recorded",
                format!(
                    "{} for {} on {}",
                    expense.amount, expense.category, expense.incurred_on
                ),
                Severity::Info,
            ),
        )
        .await;

        info!(id = %expense.id, amount = %expense.amount, category = %expense.category, "Expense recorded");

        Ok(expense)
    }

    /// The most recently entered expenses, newest first.
    pub async fn recent(&self, limit: Option<u32>) -> Result<Vec<Expense>, PosError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(self.db.expenses().list_recent(limit).await?)
    }

    /// Expenses incurred inside an inclusive day range, oldest first.
    pub async fn range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>, PosError> {
        Ok(self.db.expenses().list_range(start, end).await?)
    }

    /// Deletes a mistyped entry.
    pub async fn delete(&self, id: &str, actor: &User) -> Result<(), PosError> {
        let expense = self
            .db
            .expenses()
            .get_by_id(id)
            .await?
            .ok_or_else(|| PosError::not_found("Expense", id))?;

        self.db.expenses().delete(id).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "expense.deleted",
                format!(
                    "Removed {} ({}) dated {}",
                    expense.amount, expense.category, expense.incurred_on
                ),
                Severity::Warning,
            ),
        )
        .await;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cellar_core::Role;
    use cellar_db::DbConfig;

    fn manager() -> User {
        let now = Utc::now();
        User {
            id: "u-chifundo".to_string(),
            username: "chifundo".to_string(),
            display_name: "Chifundo Phiri".to_string(),
            password_hash: String::new(),
            role: Role::Manager,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn rent(day: u32) -> NewExpense {
        NewExpense {
            incurred_on: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            category: "Rent".to_string(),
            description: "Monthly shop rent".to_string(),
            amount: Money::from_kwacha(150_000),
        }
    }

    async fn service() -> ExpenseService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ExpenseService::new(db)
    }

    #[tokio::test]
    async fn test_record_freezes_the_recorder() {
        let expenses = service().await;

        let recorded = expenses.record(rent(1), &manager()).await.unwrap();

        assert_eq!(recorded.category, "Rent");
        assert_eq!(recorded.recorded_by_name, "Chifundo Phiri");

        let listed = expenses.recent(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, Money::from_kwacha(150_000));
    }

    #[tokio::test]
    async fn test_record_rejects_bad_input() {
        let expenses = service().await;
        let actor = manager();

        let mut free = rent(1);
        free.amount = Money::zero();
        let err = expenses.record(free, &actor).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut blank = rent(1);
        blank.description = "  ".to_string();
        let err = expenses.record(blank, &actor).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(expenses.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_filters_by_incurred_day() {
        let expenses = service().await;
        let actor = manager();

        expenses.record(rent(1), &actor).await.unwrap();
        expenses.record(rent(15), &actor).await.unwrap();
        let mut april = rent(1);
        april.incurred_on = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        expenses.record(april, &actor).await.unwrap();

        let march = expenses
            .range(
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(march.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_and_audit_trail() {
        let expenses = service().await;
        let actor = manager();

        let recorded = expenses.record(rent(1), &actor).await.unwrap();
        expenses.delete(&recorded.id, &actor).await.unwrap();

        assert!(expenses.recent(None).await.unwrap().is_empty());

        let err = expenses.delete(&recorded.id, &actor).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let entries = expenses.db.audit().list_recent(10).await.unwrap();
        assert!(entries.iter().any(|e| e.action == "expense.recorded"));
        assert!(entries.iter().any(|e| e.action == "expense.deleted"));
    }
}
