//! # Reporting Aggregator
//!
//! Profit-and-loss figures derived from persisted sales, expenses, and
//! product cost data over a date range.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Revenue        = Σ sale.total          (sales inside the range)   │
//! │  COGS           = Σ captured unit cost × qty                       │
//! │                     └─ falls back to the product's CURRENT cost    │
//! │                        only when a line has no captured cost       │
//! │  Gross profit   = revenue − COGS                                   │
//! │  Total expenses = Σ expense.amount      (dates inside the range)   │
//! │  Net profit     = gross − expenses      (a loss goes negative)     │
//! │  Margins        = profit / revenue × 100, and 0 when revenue is 0  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure: the aggregator receives already-fetched rows
//! plus a cost lookup, and "today" arrives as an argument. The storage
//! layer pre-filters by range for efficiency; the aggregator filters
//! again because the range is part of its contract.
//!
//! Captured-at-sale costs are authoritative. Editing a product's cost
//! price after historical sales exist must never change past figures;
//! the current-cost fallback only covers lines recorded without a cost.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Sale};

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive instant range covering whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Builds the range [first 00:00:00.000, last 23:59:59.999].
    pub fn over_days(first: NaiveDate, last: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// Inclusive containment check for an instant.
    #[inline]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Inclusive containment check for a calendar day (expenses carry a
    /// date, not an instant).
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start.date_naive() <= day && day <= self.end.date_naive()
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    // Last kept instant of the day: 23:59:59.999
    start_of_day(day) + Duration::days(1) - Duration::milliseconds(1)
}

// =============================================================================
// Period Presets
// =============================================================================

/// The period buttons on the reports screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// The current calendar month.
    ThisMonth,
    /// The previous calendar month.
    LastMonth,
    /// Today and the 29 days before it.
    Trailing30Days,
    /// Unix epoch through today.
    AllTime,
}

impl ReportPeriod {
    /// Resolves the preset against a reference day, normalized to the
    /// first and last instant of the boundary days.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            ReportPeriod::ThisMonth => {
                let first = first_day_of_month(today);
                DateRange::over_days(first, last_day_of_month(first))
            }
            ReportPeriod::LastMonth => {
                let prev_last = first_day_of_month(today) - Duration::days(1);
                DateRange::over_days(first_day_of_month(prev_last), prev_last)
            }
            ReportPeriod::Trailing30Days => {
                DateRange::over_days(today - Duration::days(29), today)
            }
            ReportPeriod::AllTime => DateRange {
                start: DateTime::UNIX_EPOCH,
                end: end_of_day(today),
            },
        }
    }
}

fn first_day_of_month(day: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month; the fallback is unreachable
    NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(first)
}

// =============================================================================
// Summary Types
// =============================================================================

/// One bar of the revenue/expenses chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyTotals {
    #[ts(as = "String")]
    pub day: NaiveDate,
    pub revenue: Money,
    pub expenses: Money,
}

/// The whole reports screen in one record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitSummary {
    pub range: DateRange,
    pub sale_count: usize,
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub gross_margin_pct: f64,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub net_margin_pct: f64,
    /// Sorted by day, ascending. Only days with activity appear.
    pub daily: Vec<DailyTotals>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregates sales and expenses inside `range` into a [`ProfitSummary`].
///
/// `current_cost` maps product id → current cost price; it is only
/// consulted for sale lines that carry no captured cost. A line with
/// neither (product since deleted, cost never recorded) counts into COGS
/// at zero rather than failing the report.
pub fn aggregate(
    range: DateRange,
    sales: &[Sale],
    expenses: &[Expense],
    current_cost: &HashMap<String, Money>,
) -> ProfitSummary {
    let mut revenue = Money::zero();
    let mut cogs = Money::zero();
    let mut sale_count = 0usize;
    let mut daily: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for sale in sales.iter().filter(|s| range.contains(s.created_at)) {
        sale_count += 1;
        revenue += sale.total;

        for item in &sale.items {
            let unit_cost = item
                .unit_cost
                .or_else(|| current_cost.get(&item.product_id).copied())
                .unwrap_or(Money::zero());
            cogs += unit_cost.times(item.quantity);
        }

        // Group by the UTC day component, never local-timezone-adjusted
        let day = sale.created_at.date_naive();
        daily.entry(day).or_insert((Money::zero(), Money::zero())).0 += sale.total;
    }

    let mut total_expenses = Money::zero();
    for expense in expenses.iter().filter(|e| range.contains_day(e.incurred_on)) {
        total_expenses += expense.amount;
        daily
            .entry(expense.incurred_on)
            .or_insert((Money::zero(), Money::zero()))
            .1 += expense.amount;
    }

    let gross_profit = revenue - cogs;
    let net_profit = gross_profit - total_expenses;

    ProfitSummary {
        range,
        sale_count,
        revenue,
        cogs,
        gross_profit,
        gross_margin_pct: margin_pct(gross_profit, revenue),
        total_expenses,
        net_profit,
        net_margin_pct: margin_pct(net_profit, revenue),
        daily: daily
            .into_iter()
            .map(|(day, (revenue, expenses))| DailyTotals {
                day,
                revenue,
                expenses,
            })
            .collect(),
    }
}

/// profit / revenue × 100, guarded so an empty period reports 0 instead
/// of dividing by zero.
fn margin_pct(profit: Money, revenue: Money) -> f64 {
    if revenue.is_zero() {
        0.0
    } else {
        profit.minor() as f64 / revenue.minor() as f64 * 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
