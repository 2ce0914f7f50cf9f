//! # Settings Repository
//!
//! Database operations for the single store settings row.
//!
//! The table holds at most one row, keyed `'default'` and enforced by a
//! CHECK constraint. Writes are upserts; a fresh database simply has no
//! row yet and callers fall back to [`StoreSettings::default`]. Every
//! save drops the settings snapshot so the next cached read refetches.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::cache::SnapshotCache;
use crate::error::DbResult;
use cellar_core::StoreSettings;

/// Fixed primary key of the settings row.
const SETTINGS_ROW_ID: &str = "default";

/// Repository for store settings database operations.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
    settings_cache: SnapshotCache<StoreSettings>,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository sharing the settings cache.
    pub fn new(pool: SqlitePool, settings_cache: SnapshotCache<StoreSettings>) -> Self {
        SettingsRepository {
            pool,
            settings_cache,
        }
    }

    /// Gets the store settings, `None` if never saved.
    pub async fn get(&self) -> DbResult<Option<StoreSettings>> {
        let settings = sqlx::query_as::<_, StoreSettings>(
            r#"
            SELECT shop_name, address, phone, email, receipt_footer, tax_rate
            FROM store_settings
            WHERE id = ?1
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Saves the store settings, creating the row on first save.
    pub async fn upsert(&self, settings: &StoreSettings) -> DbResult<()> {
        debug!(shop_name = %settings.shop_name, "Saving store settings");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO store_settings (
                id, shop_name, address, phone, email, receipt_footer, tax_rate, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                shop_name = excluded.shop_name,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                receipt_footer = excluded.receipt_footer,
                tax_rate = excluded.tax_rate,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&settings.shop_name)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.email)
        .bind(&settings.receipt_footer)
        .bind(settings.tax_rate)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.settings_cache.invalidate();

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
