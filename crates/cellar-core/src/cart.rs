//! # Cart Accumulator
//!
//! In-memory cart for the open order at the till.
//!
//! ## Stock-Bounded Quantities
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Scan/tap product ──► add()                                        │
//! │                        │                                           │
//! │            stock == 0? ┴─► silently ignored (button looks dead)    │
//! │            in cart?    ┴─► quantity += 1, capped at stock          │
//! │            otherwise   ┴─► new line, quantity 1                    │
//! │                                                                    │
//! │  +/- buttons ──► adjust_quantity(id, ±1)                           │
//! │                   clamped to [1, stock]; never an error            │
//! │  ✕ button    ──► remove(id)   (the only way to a zero line)        │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The invariant `1 ≤ quantity ≤ stock ceiling` holds for every line at
//! all times. Out-of-range requests clamp rather than fail: the till
//! keeps moving and the cashier sees the quantity stick at its limit.
//!
//! No persistence here. The cart lives for one order and is dropped on
//! checkout completion or cancellation; `cellar-pos::session` holds it
//! behind a mutex for the duration.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One product/quantity pair in the open order.
///
/// Name and unit price are frozen when the line is created, the same
/// snapshot rule finalized sales follow. The stock ceiling is frozen at
/// `add()` time too, and refreshed whenever the same product is added
/// again with fresher catalog data.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    /// Upper bound for `quantity`. At least 1: a line is only ever
    /// created from a product with stock on hand.
    pub available_stock: i64,
    pub quantity: i64,
}

impl CartLine {
    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The open order: an ordered list of lines, first-scanned first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product.
    ///
    /// Silently a no-op when the product is out of stock, and silently
    /// capped when the line is already at the stock ceiling. The register
    /// disables nothing; the quantity just stops moving.
    pub fn add(&mut self, product: &Product) {
        if product.stock <= 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            // Refresh the ceiling from the catalog data we were handed.
            line.available_stock = product.stock;
            if line.quantity < line.available_stock {
                line.quantity += 1;
            } else {
                // At the ceiling; also pulls a stale line back down if
                // stock fell since it was added.
                line.quantity = line.available_stock;
            }
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            available_stock: product.stock,
            quantity: 1,
        });
    }

    /// Applies a signed quantity delta, clamping the result to
    /// `[1, stock ceiling]`.
    ///
    /// Removal never happens here; driving a quantity to zero goes
    /// through [`Cart::remove`]. Returns the resulting quantity, or
    /// `None` when the product has no line.
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> Option<i64> {
        let line = self.lines.iter_mut().find(|l| l.product_id == product_id)?;
        line.quantity = (line.quantity + delta).clamp(1, line.available_stock);
        Some(line.quantity)
    }

    /// Deletes a line unconditionally. Unknown ids are a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empties the cart after a completed or abandoned checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
