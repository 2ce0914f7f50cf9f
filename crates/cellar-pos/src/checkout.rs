//! # Checkout
//!
//! Turns an open cart into a finalized, persisted sale.
//!
//! ## Finalization Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     finalize(cart, cashier, ...)                        │
//! │                                                                         │
//! │  1. Reject an empty cart                 (nothing written)              │
//! │  2. Snapshot unit costs from the catalog (nothing written; a missing    │
//! │     product fails the whole checkout here)                              │
//! │  3. Compute subtotal / VAT / total                                      │
//! │  4. Persist the sale + items             (one transaction; duplicate    │
//! │     receipt numbers abort here)                                         │
//! │  5. Append "sale.recorded" to the audit log                             │
//! │     └── failure PROPAGATES: money moved, so losing the paper trail      │
//! │         is not allowed to look like success                             │
//! │  6. Decrement stock line by line, best effort                           │
//! │     └── a failed line is logged and remembered; the remaining lines     │
//! │         still run, the sale stays persisted, and the first error        │
//! │         comes back to the register                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock decrements clamp at zero in storage, so a stale cart that sells
//! more than the recorded stock drives the count to zero rather than
//! negative or failing the sale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audit;
use crate::error::PosError;
use cellar_core::pricing;
use cellar_core::{
    Cart, CoreError, Money, PaymentMethod, Sale, SaleItem, Severity, TaxRate, User,
};
use cellar_db::{Database, DbError};

/// Checkout service: the only writer of sales.
#[derive(Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new checkout service.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Finalizes a sale from the current cart.
    ///
    /// The cart is not cleared here; the caller clears its session only
    /// after this returns `Ok`, so an aborted checkout keeps the lines
    /// on screen.
    pub async fn finalize(
        &self,
        cart: &Cart,
        cashier: &User,
        payment_method: PaymentMethod,
        tax_rate: TaxRate,
    ) -> Result<Sale, PosError> {
        debug!(lines = cart.line_count(), units = cart.unit_count(), "Finalizing sale");

        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // Cost snapshot. Profit reporting needs the cost each line carried
        // at sale time, and a product deleted since it was scanned fails
        // the checkout before anything is written.
        let catalog = self.db.catalog().await?;
        let costs: HashMap<&str, Money> =
            catalog.iter().map(|p| (p.id.as_str(), p.cost)).collect();

        for line in cart.lines() {
            if !costs.contains_key(line.product_id.as_str()) {
                return Err(CoreError::ProductNotFound(line.product_id.clone()).into());
            }
        }

        let totals = pricing::totals(cart.lines(), tax_rate);

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            receipt_number: self.next_receipt_number(now).await?,
            cashier_id: cashier.id.clone(),
            cashier_name: cashier.display_name.clone(),
            items: cart
                .lines()
                .iter()
                .map(|line| SaleItem {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    unit_cost: costs.get(line.product_id.as_str()).copied(),
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            payment_method,
            created_at: now,
        };

        self.db.sales().insert(&sale).await?;

        // Money moved; this append is not optional like the other audits.
        self.db
            .audit()
            .append(&audit::entry(
                &cashier.display_name,
                "sale.recorded",
                format!(
                    "Receipt {} for {} ({} lines, {})",
                    sale.receipt_number,
                    sale.total,
                    sale.items.len(),
                    payment_method.label()
                ),
                Severity::Info,
            ))
            .await?;

        let mut first_error: Option<DbError> = None;
        for item in &sale.items {
            if let Err(err) = self
                .db
                .products()
                .decrement_for_sale(&item.product_id, item.quantity)
                .await
            {
                warn!(
                    product_id = %item.product_id,
                    error = %err,
                    "Stock decrement failed after sale was persisted"
                );
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err.into());
        }

        info!(
            receipt = %sale.receipt_number,
            total = %sale.total,
            lines = sale.items.len(),
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Fetches a sale for reprinting by its receipt number.
    pub async fn find_by_receipt(&self, receipt_number: &str) -> Result<Sale, PosError> {
        self.db
            .sales()
            .get_by_receipt_number(receipt_number)
            .await?
            .ok_or_else(|| PosError::not_found("Sale", receipt_number))
    }

    /// Next receipt number: `RCT-YYYYMMDD-NNNN`, resetting each day.
    ///
    /// Derived by counting the day's receipts, which is right as long as
    /// the sequence is dense. If it ever is not, the receipt number's
    /// UNIQUE constraint turns the collision into a duplicate error
    /// instead of a silent overwrite.
    async fn next_receipt_number(&self, now: DateTime<Utc>) -> Result<String, PosError> {
        let prefix = format!("RCT-{}-", now.format("%Y%m%d"));
        let so_far = self.db.sales().count_with_receipt_prefix(&prefix).await?;
        Ok(format!("{}{:04}", prefix, so_far + 1))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
