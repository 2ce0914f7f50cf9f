//! # cellar-core: Pure Business Logic for Cellar POS
//!
//! This crate is the **heart** of Cellar POS. Everything the shop depends on
//! numerically - money, carts, tax, profit and loss - lives here as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      Cellar POS Architecture                       │
//! │                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────┐  │
//! │  │                  Register UI (out of tree)                   │  │
//! │  │   Login ──► Catalog ──► Cart ──► Tender ──► Receipt          │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │                                  │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │                  cellar-pos (service layer)                  │  │
//! │  │   auth, checkout, inventory, reports, receipts, export       │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │                                  │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │               ★ cellar-core (THIS CRATE) ★                   │  │
//! │  │                                                              │  │
//! │  │  ┌────────┐ ┌────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐  │  │
//! │  │  │ money  │ │  cart  │ │ pricing │ │ report │ │validation│  │  │
//! │  │  │ Money  │ │  Cart  │ │ totals  │ │  P&L   │ │  rules   │  │  │
//! │  │  │TaxRate │ │CartLine│ │         │ │ periods│ │          │  │  │
//! │  │  └────────┘ └────────┘ └─────────┘ └────────┘ └──────────┘  │  │
//! │  │                                                              │  │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS     │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │                                  │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │                  cellar-db (storage layer)                   │  │
//! │  │        SQLite repositories, snapshot caches, migrations      │  │
//! │  └──────────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Sale, Expense, StoreSettings, ...)
//! - [`money`] - Integer money in tambala (no floating point!)
//! - [`cart`] - Cart accumulator with stock-clamped quantities
//! - [`pricing`] - Subtotal / tax / total derivation
//! - [`report`] - Profit-and-loss aggregation and period presets
//! - [`validation`] - Boundary validation for records entering the system
//! - [`access`] - Role capability checks for the presentation layer
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic; anything needing "today" takes it
//!    as an argument
//! 2. **No I/O**: database, network, and file system access are FORBIDDEN
//! 3. **Integer Money**: all amounts are tambala (i64); MK 1 = 100 tambala
//! 4. **Explicit Errors**: typed errors, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use cellar_core::money::Money;
//! use cellar_core::types::TaxRate;
//!
//! // MK 45,000.00, entered as whole kwacha
//! let price = Money::from_kwacha(45_000);
//!
//! // Malawian VAT
//! let vat = TaxRate::from_bps(1650); // 16.5%
//!
//! // MK 45,000.00 at 16.5% = MK 7,425.00
//! assert_eq!(price.tax(vat), Money::from_kwacha(7_425));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// Allow `use cellar_core::Money` instead of `use cellar_core::money::Money`.

pub use access::Capability;
pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::CartTotals;
pub use report::{DailyTotals, DateRange, ProfitSummary, ReportPeriod};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default Malawian VAT rate in basis points (16.5%).
///
/// Used when seeding [`types::StoreSettings`] before the shop has saved its
/// own configuration. Every sale reads the live rate from settings, so this
/// constant only ever shows up on a fresh installation.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1650;

/// Default per-product low-stock threshold.
///
/// A product whose stock is at or below its threshold appears on the reorder
/// list. New products start here; inventory admins can tune it per product.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// How many records "recent" fetches return when the caller does not say.
///
/// Sales, expenses, and audit entries are all fetched most-recent-first with
/// a bound; the register views page beyond it explicitly.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;
