//! # Validation Module
//!
//! Input validation for records entering the system.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register UI                                                   │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate feedback while typing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service call (Rust)                                           │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (barcode, receipt number, username)             │
//! │  └── CHECK constraints (stock >= 0)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use cellar_core::validation::{validate_product_name, validate_barcode};
//!
//! validate_product_name("Malawi Gin 750ml").unwrap();
//! validate_barcode("6001234567890").unwrap();
//! ```
//!
//! Validation always runs before any persistence attempt, so an error
//! from this module means nothing was written.

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Empty is allowed (bottles without a printed code are keyed by name)
/// - Maximum 32 characters
/// - Letters, digits, and hyphens only, so EAN-13 and internal codes
///   both pass
///
/// ## Example
/// ```rust
/// use cellar_core::validation::validate_barcode;
///
/// assert!(validate_barcode("6001234567890").is_ok());
/// assert!(validate_barcode("").is_ok());
/// assert!(validate_barcode("has space").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Ok(());
    }

    if barcode.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 32,
        });
    }

    if !barcode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a product's selling and cost prices as a pair.
///
/// ## Rules
/// - Selling price must be positive
/// - Cost price must not be negative (zero is allowed for promo stock)
/// - Selling price must exceed cost price
///
/// The price/cost comparison is enforced when a product is created or
/// edited, never retroactively against historical sale records.
pub fn validate_pricing(price: Money, cost: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if cost.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "cost".to_string(),
        });
    }

    if price <= cost {
        return Err(ValidationError::PriceNotAboveCost {
            price: price.to_string(),
            cost: cost.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must not be negative
/// - Zero is allowed (sold out)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a low-stock alert threshold.
///
/// ## Rules
/// - Must not be negative
/// - Zero disables the alert for that product
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "low_stock_threshold".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Expense Validators
// =============================================================================

/// Validates an expense amount.
///
/// ## Rules
/// - Must be positive; a zero or negative expense is a data entry error
pub fn validate_expense_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates an expense category.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_expense_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates an expense description.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 500 characters
pub fn validate_expense_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 500,
        });
    }

    Ok(())
}

// =============================================================================
// Settings Validators
// =============================================================================

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Malawian VAT is 1650 (16.5%); the ceiling only guards typos
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates the shop name shown on receipts.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 120 characters
pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "shop_name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "shop_name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a contact email.
///
/// ## Rules
/// - Empty is allowed (the field is optional on the settings screen)
/// - Otherwise requires the `local@domain.tld` shape, nothing stricter
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(());
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// User Account Validators
// =============================================================================

/// Validates a login username.
///
/// ## Rules
/// - Must be between 3 and 32 characters
/// - Letters, digits, dots, hyphens, and underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 || username.len() > 32 {
        return Err(ValidationError::OutOfRange {
            field: "username".to_string(),
            min: 3,
            max: 32,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, digits, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a new password before it is hashed.
///
/// ## Rules
/// - Must be at least 8 characters
/// - Must be at most 128 characters
///
/// The hash itself is produced by the service layer; this only gates
/// what may enter the hasher.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 8 {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "must be at least 8 characters".to_string(),
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a user's display name (printed on receipts and audit rows).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "display_name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "display_name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use cellar_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Malawi Gin 750ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("6001234567890").is_ok());
        assert!(validate_barcode("GIN-750").is_ok());
        assert!(validate_barcode("").is_ok());
        assert!(validate_barcode("   ").is_ok());

        assert!(validate_barcode("has space").is_err());
        assert!(validate_barcode(&"9".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_pricing() {
        let price = Money::from_kwacha(4_500);
        let cost = Money::from_kwacha(3_000);
        assert!(validate_pricing(price, cost).is_ok());

        // Zero cost promo stock is fine
        assert!(validate_pricing(price, Money::zero()).is_ok());

        assert!(validate_pricing(Money::zero(), cost).is_err());
        assert!(validate_pricing(Money::from_kwacha(-10), cost).is_err());
        assert!(validate_pricing(price, Money::from_kwacha(-1)).is_err());
    }

    #[test]
    fn test_validate_pricing_rejects_selling_at_or_below_cost() {
        let cost = Money::from_kwacha(3_000);

        let below = validate_pricing(Money::from_kwacha(2_500), cost);
        assert!(matches!(
            below,
            Err(ValidationError::PriceNotAboveCost { .. })
        ));

        let equal = validate_pricing(cost, cost);
        assert!(matches!(
            equal,
            Err(ValidationError::PriceNotAboveCost { .. })
        ));
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(500).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_expense_amount() {
        assert!(validate_expense_amount(Money::from_kwacha(15_000)).is_ok());
        assert!(validate_expense_amount(Money::zero()).is_err());
        assert!(validate_expense_amount(Money::from_kwacha(-100)).is_err());
    }

    #[test]
    fn test_validate_expense_text_fields() {
        assert!(validate_expense_category("rent").is_ok());
        assert!(validate_expense_category("").is_err());
        assert!(validate_expense_category(&"x".repeat(60)).is_err());

        assert!(validate_expense_description("March shop rent").is_ok());
        assert!(validate_expense_description("").is_err());
        assert!(validate_expense_description(&"x".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1650).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("shop@cellar.mw").is_ok());

        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@cellar.mw").is_err());
        assert!(validate_email("shop@nodot").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("grace.m").is_ok());
        assert!(validate_username("cashier_2").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"u".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
