//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                        │
//! │                                                                    │
//! │  In floating point:                                                │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                      │
//! │                                                                    │
//! │  A day of till activity compounds those errors until the drawer    │
//! │  count and the report disagree by real kwacha.                     │
//! │                                                                    │
//! │  OUR SOLUTION: Integer Tambala                                     │
//! │    MK 1 = 100 tambala, stored as i64                               │
//! │    MK 45,000.00 = 4_500_000 tambala                                │
//! │    Every store/compute/fetch round-trips exactly                   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cellar_core::money::Money;
//!
//! // Shelf prices are whole kwacha
//! let gin = Money::from_kwacha(45_000);
//!
//! // Arithmetic stays in integers
//! let two_bottles = gin * 2;
//! assert_eq!(two_bottles, Money::from_kwacha(90_000));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (tambala; 100 per kwacha).
///
/// ## Design Decisions
/// - **i64 (signed)**: net profit can be a loss, so negatives are legal
/// - **Tuple struct**: zero-cost wrapper over i64
/// - **Transparent sqlx type**: stored as a plain INTEGER column
///
/// Every monetary value in the system - shelf price, cost price, line
/// total, tax, expense amount, report figure - flows through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from tambala (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::money::Money;
    ///
    /// let price = Money::from_minor(4_500_000); // MK 45,000.00
    /// assert_eq!(price.minor(), 4_500_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole kwacha.
    ///
    /// Shelf prices in the shop are entered in whole kwacha; this is the
    /// constructor the catalog uses.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::money::Money;
    ///
    /// let price = Money::from_kwacha(45_000);
    /// assert_eq!(price.minor(), 4_500_000);
    /// ```
    #[inline]
    pub const fn from_kwacha(kwacha: i64) -> Self {
        Money(kwacha * 100)
    }

    /// Returns the value in tambala.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-kwacha portion.
    #[inline]
    pub const fn kwacha(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the tambala portion (always 0-99).
    #[inline]
    pub const fn tambala_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount.
    ///
    /// ## Rounding Policy: round half up, at the tambala
    /// Tax is computed once on the cart subtotal in integer arithmetic:
    ///
    /// ```text
    /// tax_tambala = (amount_tambala × rate_bps + 5000) / 10000
    /// ```
    ///
    /// The `+ 5000` rounds a half-tambala remainder upward, so
    /// MK 0.50 × 15% = MK 0.075 becomes MK 0.08. This is the documented
    /// rounding policy for every derived amount in the system; no other
    /// rounding rule exists anywhere.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::money::Money;
    /// use cellar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_kwacha(45_000);
    /// let vat = TaxRate::from_bps(1650); // 16.5%
    ///
    /// // MK 45,000.00 × 16.5% = MK 7,425.00 exactly
    /// assert_eq!(subtotal.tax(vat), Money::from_kwacha(7_425));
    /// ```
    pub fn tax(&self, rate: TaxRate) -> Money {
        // i128 keeps the intermediate product safe for any realistic amount
        let tax_minor = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax_minor as i64)
    }

    /// Multiplies by a quantity, for line totals.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::money::Money;
    ///
    /// let unit_price = Money::from_kwacha(1_200); // one Green bottle
    /// assert_eq!(unit_price.times(6), Money::from_kwacha(7_200));
    /// ```
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as "MK10.50" / "-MK10.50".
///
/// This is for receipts, logs, and error messages. The register frontend
/// formats its own display values with locale separators.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}MK{}.{:02}", sign, self.kwacha().abs(), self.tambala_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.kwacha(), 10);
        assert_eq!(money.tambala_part(), 99);
    }

    #[test]
    fn test_from_kwacha() {
        assert_eq!(Money::from_kwacha(45_000).minor(), 4_500_000);
        assert_eq!(Money::from_kwacha(-5).minor(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_kwacha(45_000)), "MK45000.00");
        assert_eq!(format!("{}", Money::from_minor(1050)), "MK10.50");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-MK5.50");
        assert_eq!(format!("{}", Money::zero()), "MK0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.minor(), 1500);
        acc -= b;
        assert_eq!(acc.minor(), 1000);
    }

    #[test]
    fn test_tax_exact() {
        // The shop's standard case: MK 45,000 at Malawian VAT 16.5%
        let subtotal = Money::from_kwacha(45_000);
        let vat = TaxRate::from_bps(1650);
        assert_eq!(subtotal.tax(vat), Money::from_kwacha(7_425));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // MK 0.50 at 15% = 7.5 tambala, rounds up to 8
        let amount = Money::from_minor(50);
        let rate = TaxRate::from_bps(1500);
        assert_eq!(amount.tax(rate).minor(), 8);

        // MK 0.99 at 16.5% = 16.335 tambala, rounds down to 16
        let amount = Money::from_minor(99);
        let rate = TaxRate::from_bps(1650);
        assert_eq!(amount.tax(rate).minor(), 16);
    }

    #[test]
    fn test_tax_zero_rate() {
        let amount = Money::from_kwacha(1_000);
        assert_eq!(amount.tax(TaxRate::zero()), Money::zero());
    }

    #[test]
    fn test_times() {
        let unit_price = Money::from_minor(299);
        assert_eq!(unit_price.times(3).minor(), 897);
        assert_eq!(unit_price.times(0).minor(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let loss = Money::from_kwacha(-25_000);
        assert!(loss.is_negative());
        assert_eq!(loss.abs(), Money::from_kwacha(25_000));
    }

    /// Splitting MK 10.00 three ways loses one tambala. That loss is
    /// explicit and visible, unlike a float drifting silently.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_minor(1000);
        let one_third = Money::from_minor(1000 / 3); // 333
        let reconstructed = one_third * 3; // 999

        assert_eq!(reconstructed.minor(), 999);
        assert_eq!((ten - reconstructed).minor(), 1);
    }
}
