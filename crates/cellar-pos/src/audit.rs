//! Activity log helpers shared by the services.
//!
//! Most operations treat the audit write as best-effort: a refused append
//! is logged and the operation still succeeds. Checkout is the exception
//! and calls the repository directly so the failure propagates; a sale
//! without its paper trail is not allowed to complete.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use cellar_core::{ActivityEntry, Severity};
use cellar_db::Database;

/// Builds an activity entry stamped with a fresh id and the current time.
pub(crate) fn entry(actor: &str, action: &str, details: String, severity: Severity) -> ActivityEntry {
    ActivityEntry {
        id: Uuid::new_v4().to_string(),
        actor: actor.to_string(),
        action: action.to_string(),
        details,
        severity,
        created_at: Utc::now(),
    }
}

/// Appends an entry, logging a warning instead of failing the caller.
pub(crate) async fn record(db: &Database, entry: ActivityEntry) {
    if let Err(err) = db.audit().append(&entry).await {
        warn!(error = %err, action = %entry.action, "Failed to record activity entry");
    }
}
