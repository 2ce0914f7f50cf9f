//! # cellar-pos: Application Services for Cellar POS
//!
//! The service layer the register shell calls into. Everything here
//! orchestrates the pure rules in `cellar-core` over the repositories
//! in `cellar-db` and maps failures to one register-facing error shape.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cellar POS Service Layer                           │
//! │                                                                         │
//! │  Register shell (views, navigation; out of scope here)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cellar-pos (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   AuthService        login, tokens, lockout, user admin        │   │
//! │  │   CartSession        shared in-memory cart for the till        │   │
//! │  │   CheckoutService    cart → persisted sale + stock decrements  │   │
//! │  │   InventoryService   catalog CRUD, restock, watch lists        │   │
//! │  │   ExpenseService     expense records                           │   │
//! │  │   SettingsService    shop identity + live tax rate             │   │
//! │  │   ReportService      profit summaries, recent activity        │   │
//! │  │   receipt / export   printable receipts, CSV files            │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  cellar-core (pure rules)       cellar-db (SQLite repositories)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cellar_pos::{AppConfig, AuthService, CheckoutService};
//! use cellar_db::{Database, DbConfig};
//!
//! let config = AppConfig::load()?;
//! let db = Database::new(DbConfig::new(&config.database_path)).await?;
//!
//! let auth = AuthService::new(db.clone(), &config);
//! auth.ensure_bootstrap_admin().await?;
//!
//! let session = auth.login("admin", "admin123").await?;
//! let sale = CheckoutService::new(db.clone())
//!     .finalize(&cart, &session.user, payment, tax_rate)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod audit;

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod expenses;
pub mod export;
pub mod inventory;
pub mod receipt;
pub mod reports;
pub mod session;
pub mod settings;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{AuthError, AuthService, AuthSession, Claims, NewUser};
pub use checkout::CheckoutService;
pub use config::{AppConfig, ConfigError};
pub use error::{ErrorCode, PosError};
pub use expenses::{ExpenseService, NewExpense};
pub use inventory::{InventoryService, NewProduct};
pub use reports::ReportService;
pub use session::CartSession;
pub use settings::SettingsService;
