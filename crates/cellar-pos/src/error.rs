//! # Service Error Type
//!
//! Unified error type for register-facing operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cellar POS                             │
//! │                                                                         │
//! │  Register UI                 Service Layer                              │
//! │  ───────────                 ─────────────                              │
//! │                                                                         │
//! │  checkout(...)                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Service Method                                                  │   │
//! │  │  Result<T, PosError>                                             │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Storage error?  ── DbError::QueryFailed("...") ──┐              │   │
//! │  │         │                                         │              │   │
//! │  │         ▼                                         ▼              │   │
//! │  │  Rule broken?    ── CoreError::EmptyCart ──── PosError ─────────►│   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Login problem?  ── AuthError::RateLimited ───────┘              │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  The UI receives one JSON shape for every failure:                      │
//! │  { "code": "NOT_FOUND", "message": "Product not found: p-123" }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal detail (SQL text, sqlx messages) is logged here and never
//! forwarded; the register only sees the generic message for storage
//! failures.

use serde::Serialize;

use crate::auth::AuthError;
use cellar_core::{CoreError, ValidationError};
use cellar_db::DbError;

/// Error returned from every service-layer operation.
///
/// ## Serialization
/// This is what the register receives when an operation fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Product name cannot be empty"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await checkout(payment);
/// } catch (e) {
///   switch (e.code) {
///     case 'VALIDATION_ERROR':
///       showForm(e.message);
///       break;
///     case 'RATE_LIMITED':
///       showLockoutTimer(e.message);
///       break;
///     default:
///       showError('An error occurred');
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Unique value already taken (barcode, username, receipt number)
    Duplicate,

    /// Database operation failed
    DatabaseError,

    /// Business rule refused the operation
    BusinessLogic,

    /// Username/password rejected
    InvalidCredentials,

    /// Too many failed logins; locked out for a while
    RateLimited,

    /// Account exists but has been disabled
    AccountDisabled,

    /// Identity layer is not configured (missing token secret)
    AuthMisconfigured,

    /// CSV export could not be produced
    ExportFailed,

    /// Internal error
    Internal,
}

impl PosError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        PosError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business logic error.
    pub fn business(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::BusinessLogic, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to service errors.
impl From<DbError> for PosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PosError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => PosError::new(
                ErrorCode::Duplicate,
                format!("Duplicate value for {}", field),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                PosError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                PosError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                PosError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                PosError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                PosError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                PosError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts business-rule errors to service errors.
impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => PosError::validation(err.to_string()),
            CoreError::ProductNotFound(id) => PosError::not_found("Product", &id),
            CoreError::Validation(e) => PosError::validation(e.to_string()),
        }
    }
}

/// Converts input-validation errors to service errors.
///
/// Routes through `CoreError::Validation` so the mapping stays identical
/// to the documented `ValidationError → CoreError → PosError` flow.
impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::from(CoreError::from(err))
    }
}

/// Converts login/session errors to service errors.
impl From<AuthError> for PosError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => PosError::new(
                ErrorCode::InvalidCredentials,
                "Invalid username or password",
            ),
            AuthError::RateLimited { retry_after_secs } => PosError::new(
                ErrorCode::RateLimited,
                format!(
                    "Too many failed attempts. Try again in {} seconds",
                    retry_after_secs
                ),
            ),
            AuthError::AccountDisabled => {
                PosError::new(ErrorCode::AccountDisabled, "This account has been disabled")
            }
            AuthError::Misconfigured(msg) => {
                tracing::error!("Auth misconfigured: {}", msg);
                PosError::new(
                    ErrorCode::AuthMisconfigured,
                    "Sign-in is not configured on this terminal",
                )
            }
            AuthError::Storage(msg) => {
                tracing::error!("Auth storage error: {}", msg);
                PosError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            AuthError::Internal(msg) => {
                tracing::error!("Auth internal error: {}", msg);
                PosError::internal("An internal error occurred")
            }
        }
    }
}

impl std::fmt::Display for PosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for PosError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_serialize_screaming_snake() {
        let err = PosError::not_found("Product", "p-123");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: p-123");

        let err = PosError::new(ErrorCode::InvalidCredentials, "nope");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_db_unique_violation_maps_to_duplicate() {
        let err: PosError = DbError::UniqueViolation {
            field: "products.barcode".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert!(err.message.contains("products.barcode"));
    }

    #[test]
    fn test_db_query_failure_message_is_generic() {
        let err: PosError = DbError::QueryFailed("no such table: sales".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        // The sqlx detail is logged, not surfaced
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_empty_cart_maps_to_validation() {
        let err: PosError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Cannot finalize a sale with an empty cart");
    }

    #[test]
    fn test_auth_rate_limit_carries_retry_hint() {
        let err: PosError = AuthError::RateLimited {
            retry_after_secs: 300,
        }
        .into();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert!(err.message.contains("300"));
    }
}
