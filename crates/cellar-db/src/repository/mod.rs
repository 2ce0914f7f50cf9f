//! # Repository Module
//!
//! Database repository implementations for Cellar POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                           │
//! │       │                                                                 │
//! │       │  db.sales().list_range(start, end)                              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── insert(&self, sale)                                                │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_recent(&self, limit)                                          │
//! │  └── list_range(&self, start, end)                                      │
//! │       │                                                                 │
//! │       │  SQL query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Repositories hold no business rules: clamping, validation, and        │
//! │  totals all happen in cellar-core before a record reaches here.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and stock adjustments
//! - [`sale::SaleRepository`] - Append-only sale records
//! - [`expense::ExpenseRepository`] - Operating expenses
//! - [`settings::SettingsRepository`] - The settings singleton
//! - [`audit::AuditRepository`] - Append-only activity log
//! - [`user::UserRepository`] - Staff accounts

pub mod audit;
pub mod expense;
pub mod product;
pub mod sale;
pub mod settings;
pub mod user;
