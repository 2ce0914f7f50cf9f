//! # Error Types
//!
//! Domain-specific error types for cellar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                               │
//! │                                                                    │
//! │  cellar-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                   │
//! │  └── ValidationError  - Input validation failures                  │
//! │                                                                    │
//! │  cellar-db errors (storage crate)                                  │
//! │  └── DbError          - SQLite operation failures                  │
//! │                                                                    │
//! │  cellar-pos errors (service crate)                                 │
//! │  ├── AuthError        - Classified sign-in failures                │
//! │  └── PosError         - What the register UI sees (serialized)     │
//! │                                                                    │
//! │  Flow: ValidationError → CoreError → DbError → PosError → UI       │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derives, never manual Display impls
//! 2. Carry context in the variant (product id, offending amounts)
//! 3. Validation happens before any persistence attempt, so a
//!    `ValidationError` always means nothing was written

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Raised by the cart/checkout/reporting rules before anything touches
/// storage. Translated to user-facing messages by the service layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was confirmed with nothing in the cart.
    ///
    /// ## When This Occurs
    /// - Cashier presses "confirm payment" after clearing the cart
    /// - A stale tender screen submits after another terminal action
    ///
    /// Nothing has been persisted when this is raised.
    #[error("Cannot finalize a sale with an empty cart")]
    EmptyCart,

    /// Product cannot be found in the catalog.
    ///
    /// During checkout this is raised in the cost-snapshot step, which runs
    /// before the sale is written, so no records exist yet.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a record entering the system does not meet requirements.
/// Always precedes business logic and persistence.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed barcode or UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Selling below cost. Enforced when a product is created or edited,
    /// never retroactively against historical sale records.
    #[error("Selling price {price} must exceed cost price {cost}")]
    PriceNotAboveCost { price: String, cost: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot finalize a sale with an empty cart"
        );
        assert_eq!(
            CoreError::ProductNotFound("p-123".to_string()).to_string(),
            "Product not found: p-123"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::PriceNotAboveCost {
            price: "MK100.00".to_string(),
            cost: "MK150.00".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Selling price MK100.00 must exceed cost price MK150.00"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
