//! # Reports
//!
//! Fetch-then-aggregate glue for the reports screen. The storage layer
//! pre-filters rows by range; the pure aggregator in the core crate does
//! the arithmetic and re-filters as part of its own contract.
//!
//! Nothing here writes, so no audit entries are recorded.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::PosError;
use cellar_core::report::{aggregate, DateRange, ProfitSummary, ReportPeriod};
use cellar_core::{ActivityEntry, Money, Sale, DEFAULT_RECENT_LIMIT};
use cellar_db::Database;

/// Reporting service.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Resolves a period preset against the given day and summarizes it.
    ///
    /// "Today" is an argument so the register decides what day it is;
    /// the service stays deterministic under test.
    pub async fn summary_for_period(
        &self,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<ProfitSummary, PosError> {
        self.summary(period.resolve(today)).await
    }

    /// Profit-and-loss summary over an explicit range.
    pub async fn summary(&self, range: DateRange) -> Result<ProfitSummary, PosError> {
        debug!(start = %range.start, end = %range.end, "Building profit summary");

        let sales = self.db.sales().list_range(range.start, range.end).await?;
        let expenses = self
            .db
            .expenses()
            .list_range(range.start.date_naive(), range.end.date_naive())
            .await?;

        // Current costs back-fill sale lines recorded without a captured
        // cost; lines that have one keep it.
        let current_cost: HashMap<String, Money> = self
            .db
            .catalog()
            .await?
            .into_iter()
            .map(|product| (product.id, product.cost))
            .collect();

        Ok(aggregate(range, &sales, &expenses, &current_cost))
    }

    /// Latest sales, newest first.
    pub async fn recent_sales(&self, limit: Option<u32>) -> Result<Vec<Sale>, PosError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(self.db.sales().list_recent(limit).await?)
    }

    /// Latest activity log entries, newest first.
    pub async fn recent_activity(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ActivityEntry>, PosError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(self.db.audit().list_recent(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
