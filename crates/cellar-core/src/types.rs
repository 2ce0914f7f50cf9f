//! # Domain Types
//!
//! Core domain records used throughout Cellar POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                              │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │    Product     │   │      Sale      │   │    Expense     │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │     │
//! │  │  barcode       │   │  receipt_no    │   │  incurred_on   │     │
//! │  │  price, cost   │   │  items[]       │   │  amount        │     │
//! │  │  stock         │   │  totals        │   │  category      │     │
//! │  └────────────────┘   └────────────────┘   └────────────────┘     │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │    TaxRate     │   │ PaymentMethod  │   │    Category    │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  bps (u32)     │   │  Cash          │   │  Spirits Wines │     │
//! │  │  1650 = 16.5%  │   │  AirtelMoney   │   │  Beer SoftDrks │     │
//! │  │                │   │  Mpamba        │   │  Cigarettes    │     │
//! │  │                │   │  BankTransfer  │   │  Snacks        │     │
//! │  └────────────────┘   └────────────────┘   └────────────────┘     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Sale` is immutable once written: its items freeze the product name,
//! unit price, and unit cost at the moment of sale, so later catalog edits
//! never rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000.
/// 1650 bps = 16.5%, the Malawian VAT rate the shop charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (settings screen convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// Shelf category for a product.
///
/// The shop's whole range fits in six categories; the register UI renders
/// one tab per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Spirits,
    Wines,
    Beer,
    SoftDrinks,
    Cigarettes,
    Snacks,
}

impl Category {
    /// All categories, in shelf order.
    pub const ALL: [Category; 6] = [
        Category::Spirits,
        Category::Wines,
        Category::Beer,
        Category::SoftDrinks,
        Category::Cigarettes,
        Category::Snacks,
    ];

    /// Storage/export identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Spirits => "spirits",
            Category::Wines => "wines",
            Category::Beer => "beer",
            Category::SoftDrinks => "soft_drinks",
            Category::Cigarettes => "cigarettes",
            Category::Snacks => "snacks",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was settled.
///
/// All methods are settled outside this system (cash drawer, customer's
/// phone, bank slip); the method is recorded for the books only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins in the drawer.
    Cash,
    /// Airtel Money transfer.
    AirtelMoney,
    /// TNM Mpamba transfer.
    Mpamba,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Storage/export identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::AirtelMoney => "airtel_money",
            PaymentMethod::Mpamba => "mpamba",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Human-readable name, as printed on receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::AirtelMoney => "Airtel Money",
            PaymentMethod::Mpamba => "TNM Mpamba",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// Staff role assigned at login.
///
/// Capabilities derived from a role live in [`crate::access`]; the role
/// itself is just data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shop owner. Everything, including settings and staff accounts.
    Admin,
    /// Floor manager. Inventory, expenses, and reports.
    Manager,
    /// Till operator. Sales only.
    Cashier,
}

impl Role {
    /// Stable string form, matching the database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Shelf category.
    pub category: Category,

    /// Selling price. Must exceed `cost`; enforced when the product is
    /// created or edited, not by the storage layer.
    pub price: Money,

    /// Cost price, used for profit figures.
    pub cost: Money,

    /// Units on hand. Never negative; sale decrements clamp at zero.
    pub stock: i64,

    /// Barcode, unique within the catalog.
    pub barcode: String,

    /// At or below this stock level the product lands on the reorder list.
    pub low_stock_threshold: i64,

    /// Expiry date for perishables (mostly the soft drinks fridge).
    #[ts(as = "Option<String>")]
    pub expires_on: Option<NaiveDate>,

    /// Supplier reference.
    pub supplier: Option<String>,

    /// Image reference for the register UI.
    pub image_ref: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether any units are on hand.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product should appear on the reorder list.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Whether the product has expired as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.expires_on, Some(d) if d < today)
    }

    /// Margin per unit at current prices.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price - self.cost
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A finalized sale.
///
/// Immutable once written: there is no update or delete path anywhere in
/// the system. Reporting reads these records as-is.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    /// Unique identifier (UUID v4). A collision on insert is a hard
    /// duplicate-key error, never an overwrite.
    pub id: String,

    /// Human-readable receipt number, unique per sale.
    pub receipt_number: String,

    /// Cashier who rang the sale (frozen at sale time).
    pub cashier_id: String,
    pub cashier_name: String,

    /// Line items, in the order they were rung up.
    pub items: Vec<SaleItem>,

    /// Sum of line totals.
    pub subtotal: Money,

    /// Tax on the subtotal at the rate configured when the sale was made.
    pub tax: Money,

    /// subtotal + tax.
    pub total: Money,

    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item within a finalized sale.
///
/// Snapshot pattern: name, unit price, and unit cost are frozen at the
/// moment of sale so historical figures survive later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price at time of sale (frozen).
    pub unit_price: Money,

    /// Unit cost at time of sale (frozen). Reporting falls back to the
    /// product's current cost only when this is absent.
    pub unit_cost: Option<Money>,

    /// unit_price × quantity.
    pub line_total: Money,
}

// =============================================================================
// Expense
// =============================================================================

/// An operating expense, independent of sales. Only reporting reads these.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,

    /// Day the expense was incurred (not the day it was entered).
    #[ts(as = "String")]
    pub incurred_on: NaiveDate,

    /// Free-text category ("rent", "transport", "stock purchase", ...).
    pub category: String,

    pub description: String,

    pub amount: Money,

    /// Who entered it (frozen).
    pub recorded_by_id: String,
    pub recorded_by_name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Store Settings
// =============================================================================

/// Shop identity and the live tax rate. Singleton record, cached after the
/// first read; the seeded default below is served until the shop saves its
/// own values (and whenever the settings read fails).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StoreSettings {
    pub shop_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,

    /// Printed at the bottom of every receipt.
    pub receipt_footer: String,

    /// Applied to every sale finalized after the change; historical sales
    /// keep the rate they were rung at.
    pub tax_rate: TaxRate,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            shop_name: "Cellar Liquor Shop".to_string(),
            address: "Area 47, Lilongwe".to_string(),
            phone: "+265 888 000 000".to_string(),
            email: String::new(),
            receipt_footer: "Thank you, come again!".to_string(),
            tax_rate: TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS),
        }
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// Severity of an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One append-only audit record. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ActivityEntry {
    pub id: String,

    /// Display name of whoever did it.
    pub actor: String,

    /// Short machine-friendly action ("sale.recorded", "product.updated").
    pub action: String,

    /// Free-text details for the audit view.
    pub details: String,

    pub severity: Severity,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A staff account in the local identity table.
///
/// The password hash never leaves this process: it is skipped on
/// serialization and absent from the TypeScript bindings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,

    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    pub role: Role,

    /// Deactivated accounts fail login but keep their audit history.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Malawi Gin 750ml".to_string(),
            category: Category::Spirits,
            price: Money::from_kwacha(45_000),
            cost: Money::from_kwacha(30_000),
            stock: 10,
            barcode: "6001234567890".to_string(),
            low_stock_threshold: 5,
            expires_on: None,
            supplier: None,
            image_ref: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1650);
        assert_eq!(rate.bps(), 1650);
        assert!((rate.percentage() - 16.5).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(16.5);
        assert_eq!(rate.bps(), 1650);
    }

    #[test]
    fn test_category_round_trip_str() {
        for cat in Category::ALL {
            assert!(!cat.as_str().is_empty());
        }
        assert_eq!(Category::SoftDrinks.as_str(), "soft_drinks");
        assert_eq!(Category::SoftDrinks.to_string(), "soft_drinks");
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::AirtelMoney.label(), "Airtel Money");
        assert_eq!(PaymentMethod::Mpamba.as_str(), "mpamba");
        assert_eq!(PaymentMethod::BankTransfer.label(), "Bank Transfer");
    }

    #[test]
    fn test_product_stock_flags() {
        let mut product = sample_product();
        assert!(product.in_stock());
        assert!(!product.is_low_stock());

        product.stock = 5; // exactly at threshold counts as low
        assert!(product.is_low_stock());

        product.stock = 0;
        assert!(!product.in_stock());
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_product_expiry() {
        let mut product = sample_product();
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();

        assert!(!product.is_expired(today));

        product.expires_on = NaiveDate::from_ymd_opt(2026, 6, 14);
        assert!(product.is_expired(today));

        // Expiring today is not yet expired
        product.expires_on = NaiveDate::from_ymd_opt(2026, 6, 15);
        assert!(!product.is_expired(today));
    }

    #[test]
    fn test_product_unit_margin() {
        let product = sample_product();
        assert_eq!(product.unit_margin(), Money::from_kwacha(15_000));
    }

    #[test]
    fn test_settings_default_rate() {
        let settings = StoreSettings::default();
        assert_eq!(settings.tax_rate.bps(), 1650);
        assert!(!settings.shop_name.is_empty());
    }

    #[test]
    fn test_user_hash_not_serialized() {
        let user = User {
            id: "u-1".to_string(),
            username: "grace".to_string(),
            display_name: "Grace Banda".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Cashier,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("grace"));
    }
}
