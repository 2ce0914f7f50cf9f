//! # Audit Repository
//!
//! Append-only activity log. Rows are written once and only ever read
//! back for the activity view; there is no update or delete path.
//!
//! Whether a failed append aborts the caller is the caller's decision:
//! checkout refuses to lose the paper trail for money movements, while
//! catalog edits log a warning and carry on.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use cellar_core::ActivityEntry;

/// Repository for activity log database operations.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Appends one activity entry.
    pub async fn append(&self, entry: &ActivityEntry) -> DbResult<()> {
        debug!(action = %entry.action, actor = %entry.actor, "Appending activity entry");

        sqlx::query(
            r#"
            INSERT INTO activity_log (id, actor, action, details, severity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.actor)
        .bind(&entry.action)
        .bind(&entry.details)
        .bind(entry.severity)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists the most recent entries, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            r#"
            SELECT id, actor, action, details, severity, created_at
            FROM activity_log
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Counts all entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_log")
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
    use cellar_core::Severity;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn entry(action: &str, severity: Severity, hour: u32) -> ActivityEntry {
        ActivityEntry {
            id: Uuid::new_v4().to_string(),
            actor: "Grace Banda".to_string(),
            action: action.to_string(),
            details: format!("{action} details"),
            severity,
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let db = test_db().await;

        db.audit()
            .append(&entry("sale.recorded", Severity::Info, 9))
            .await
            .unwrap();
        db.audit()
            .append(&entry("product.deleted", Severity::Warning, 14))
            .await
            .unwrap();
        db.audit()
            .append(&entry("stock.adjusted", Severity::Info, 11))
            .await
            .unwrap();

        let entries = db.audit().list_recent(10).await.unwrap();
        let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["product.deleted", "stock.adjusted", "sale.recorded"]
        );
    }

    #[tokio::test]
    async fn test_severity_round_trip() {
        let db = test_db().await;

        db.audit()
            .append(&entry("login.throttled", Severity::Warning, 10))
            .await
            .unwrap();

        let entries = db.audit().list_recent(1).await.unwrap();
        assert_eq!(entries[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_limit_is_applied() {
        let db = test_db().await;

        for hour in 8..13 {
            db.audit()
                .append(&entry("sale.recorded", Severity::Info, hour))
                .await
                .unwrap();
        }

        assert_eq!(db.audit().list_recent(3).await.unwrap().len(), 3);
        assert_eq!(db.audit().count().await.unwrap(), 5);
    }
}
