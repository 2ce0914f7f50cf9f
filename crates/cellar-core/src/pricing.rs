//! # Pricing Calculator
//!
//! Pure derivation of (cart lines, tax rate) → subtotal / tax / total.
//!
//! - subtotal = Σ (unit price × quantity)
//! - tax      = subtotal × rate, rounded half up at the tambala
//!              (the policy documented on [`Money::tax`])
//! - total    = subtotal + tax
//!
//! Tax applies once to the subtotal, not per line: the shop charges one
//! VAT rate across the whole range, so per-line tax would only invite
//! rounding drift between the receipt body and its footer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::TaxRate;

/// The three figures at the bottom of every receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// Totals for an empty cart.
    pub const fn zero() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Computes totals for a set of cart lines at the given tax rate.
///
/// ## Example
/// ```rust
/// use cellar_core::cart::Cart;
/// use cellar_core::money::Money;
/// use cellar_core::pricing::totals;
/// use cellar_core::types::TaxRate;
///
/// # use cellar_core::types::{Category, Product};
/// # use chrono::{TimeZone, Utc};
/// # let gin = Product {
/// #     id: "p1".into(), name: "Malawi Gin 750ml".into(),
/// #     category: Category::Spirits,
/// #     price: Money::from_kwacha(45_000), cost: Money::from_kwacha(30_000),
/// #     stock: 5, barcode: "b1".into(), low_stock_threshold: 5,
/// #     expires_on: None, supplier: None, image_ref: None,
/// #     created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
/// #     updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
/// # };
/// let mut cart = Cart::new();
/// cart.add(&gin); // one bottle at MK 45,000
///
/// let t = totals(cart.lines(), TaxRate::from_bps(1650));
/// assert_eq!(t.subtotal, Money::from_kwacha(45_000));
/// assert_eq!(t.tax, Money::from_kwacha(7_425));
/// assert_eq!(t.total, Money::from_kwacha(52_425));
/// ```
pub fn totals(lines: &[CartLine], rate: TaxRate) -> CartTotals {
    let subtotal = lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.line_total());
    let tax = subtotal.tax(rate);

    CartTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
