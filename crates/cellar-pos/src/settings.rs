//! # Store Settings
//!
//! Shop identity and the live tax rate. A fresh install serves the
//! seeded defaults until the shopkeeper saves their own values; the
//! cached read lives in the database layer and is dropped on save.

use tracing::info;

use crate::audit;
use crate::error::PosError;
use cellar_core::validation::{validate_email, validate_shop_name, validate_tax_rate_bps};
use cellar_core::{Severity, StoreSettings, User};
use cellar_db::Database;

/// Settings service.
#[derive(Clone)]
pub struct SettingsService {
    db: Database,
}

impl SettingsService {
    /// Creates a new settings service.
    pub fn new(db: Database) -> Self {
        SettingsService { db }
    }

    /// The current settings: the saved row, or the defaults on a fresh
    /// install (and whenever the read fails).
    pub async fn current(&self) -> StoreSettings {
        self.db.settings().await
    }

    /// Saves the settings, creating the row on the first save.
    ///
    /// The new tax rate applies to every sale finalized afterwards;
    /// sales already on the books keep the rate they were rung at.
    pub async fn save(
        &self,
        mut settings: StoreSettings,
        actor: &User,
    ) -> Result<StoreSettings, PosError> {
        validate_shop_name(&settings.shop_name)?;
        validate_email(&settings.email)?;
        validate_tax_rate_bps(settings.tax_rate.bps())?;

        settings.shop_name = settings.shop_name.trim().to_string();
        settings.address = settings.address.trim().to_string();
        settings.phone = settings.phone.trim().to_string();
        settings.email = settings.email.trim().to_string();
        settings.receipt_footer = settings.receipt_footer.trim().to_string();

        self.db.settings_repo().upsert(&settings).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "settings.updated",
                format!(
                    "Saved store settings for '{}' (VAT {} bps)",
                    settings.shop_name,
                    settings.tax_rate.bps()
                ),
                Severity::Info,
            ),
        )
        .await;

        info!(shop_name = %settings.shop_name, tax_rate_bps = settings.tax_rate.bps(), "Settings saved");

        Ok(settings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cellar_core::{Role, TaxRate};
    use cellar_db::DbConfig;
    use chrono::Utc;

    fn admin() -> User {
        let now = Utc::now();
        User {
            id: "u-takondwa".to_string(),
            username: "takondwa".to_string(),
            display_name: "Takondwa Mwale".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn service() -> SettingsService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SettingsService::new(db)
    }

    #[tokio::test]
    async fn test_fresh_install_serves_defaults() {
        let settings = service().await;
        assert_eq!(settings.current().await, StoreSettings::default());
    }

    #[tokio::test]
    async fn test_save_persists_and_is_served_back() {
        let settings = service().await;

        let mut edited = StoreSettings::default();
        edited.shop_name = "  Chikondi Bottle Store  ".to_string();
        edited.email = "chikondi@example.mw".to_string();
        edited.tax_rate = TaxRate::from_bps(1650);
        let saved = settings.save(edited, &admin()).await.unwrap();

        // Whitespace trimmed before the write
        assert_eq!(saved.shop_name, "Chikondi Bottle Store");

        let current = settings.current().await;
        assert_eq!(current.shop_name, "Chikondi Bottle Store");
        assert_eq!(current.tax_rate.bps(), 1650);

        let entries = settings.db.audit().list_recent(5).await.unwrap();
        assert!(entries.iter().any(|e| e.action == "settings.updated"));
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let settings = service().await;
        let actor = admin();

        let mut nameless = StoreSettings::default();
        nameless.shop_name = "   ".to_string();
        let err = settings.save(nameless, &actor).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut bad_email = StoreSettings::default();
        bad_email.email = "not-an-email".to_string();
        let err = settings.save(bad_email, &actor).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Nothing was written; the defaults still serve
        assert_eq!(settings.current().await, StoreSettings::default());
    }

    #[tokio::test]
    async fn test_new_rate_applies_going_forward() {
        let settings = service().await;

        let mut edited = StoreSettings::default();
        edited.tax_rate = TaxRate::zero();
        settings.save(edited, &admin()).await.unwrap();

        // The cached read was invalidated by the save
        assert!(settings.current().await.tax_rate.is_zero());
    }
}
