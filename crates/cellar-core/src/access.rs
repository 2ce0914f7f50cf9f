//! # Role Capabilities
//!
//! Pure authorization logic: which role may open which part of the app.
//!
//! The presentation layer asks `role.allows(capability)` before showing a
//! view or enabling an action. Services do not re-check; keeping the rule
//! in one function means the matrix below is the single source of truth.
//!
//! ```text
//!                      Admin   Manager   Cashier
//! RecordSales            ✓        ✓         ✓
//! ManageInventory        ✓        ✓         ✗
//! RecordExpenses         ✓        ✓         ✗
//! ViewReports            ✓        ✓         ✗
//! ViewAuditLog           ✓        ✓         ✗
//! ManageSettings         ✓        ✗         ✗
//! ManageUsers            ✓        ✗         ✗
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Role;

/// Something a signed-in staff member may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Ring up sales at the till.
    RecordSales,
    /// Create, edit, restock, and delete products.
    ManageInventory,
    /// Enter operating expenses.
    RecordExpenses,
    /// Open the profit-and-loss view and exports.
    ViewReports,
    /// Read the activity log.
    ViewAuditLog,
    /// Edit shop identity and the tax rate.
    ManageSettings,
    /// Create staff accounts and assign roles.
    ManageUsers,
}

impl Role {
    /// Whether this role grants a capability.
    pub const fn allows(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => matches!(
                capability,
                Capability::RecordSales
                    | Capability::ManageInventory
                    | Capability::RecordExpenses
                    | Capability::ViewReports
                    | Capability::ViewAuditLog
            ),
            Role::Cashier => matches!(capability, Capability::RecordSales),
        }
    }
}
