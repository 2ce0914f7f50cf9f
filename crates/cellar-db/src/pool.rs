//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  App Startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │            SqlitePool                   │                            │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐        │  (max_connections)         │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...    │                            │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘        │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       │ Concurrent access from service calls                            │
//! │       ▼                                                                 │
//! │  db.products() / db.sales() / db.catalog() ...                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers, writers don't block readers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use cellar_core::{Product, StoreSettings};

use crate::cache::SnapshotCache;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::audit::AuditRepository;
use crate::repository::expense::ExpenseRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::settings::SettingsRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/cellar.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (plenty for a single till)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // each in-memory connection is its own database
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access and the snapshot
/// caches.
///
/// Cloning is cheap: the pool and both caches are shared handles, so
/// every service sees the same cache state.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Cached full catalog, refreshed on demand.
    catalog_cache: SnapshotCache<Vec<Product>>,

    /// Cached settings singleton.
    settings_cache: SnapshotCache<StoreSettings>,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite for a single-till workload:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.database_path.as_os_str() == ":memory:" {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            // sqlite://path?mode=rwc creates the file if not exists
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        };

        let connect_options = connect_options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            catalog_cache: SnapshotCache::new(),
            settings_cache: SnapshotCache::new(),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories. Prefer the
    /// repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// Returns the product repository.
    ///
    /// The repository shares the catalog cache and invalidates it on
    /// every write.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone(), self.catalog_cache.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone())
    }

    /// Returns the settings repository.
    ///
    /// The repository shares the settings cache and invalidates it on
    /// every save.
    pub fn settings_repo(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone(), self.settings_cache.clone())
    }

    /// Returns the activity log repository.
    pub fn audit(&self) -> AuditRepository {
        AuditRepository::new(self.pool.clone())
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Cached Reads
    // =========================================================================

    /// Returns the whole catalog, served from cache when fresh.
    ///
    /// ## Degraded Reads
    /// When the fetch fails but an older snapshot exists, the snapshot is
    /// returned and a warning is logged. The register keeps selling from
    /// slightly stale data rather than blanking the product grid. With no
    /// snapshot at all the error surfaces.
    pub async fn catalog(&self) -> DbResult<Vec<Product>> {
        if let Some(products) = self.catalog_cache.get() {
            return Ok(products);
        }

        match self.products().list_all().await {
            Ok(products) => {
                self.catalog_cache.store(products.clone());
                Ok(products)
            }
            Err(err) => match self.catalog_cache.last_known() {
                Some(stale) => {
                    warn!(error = %err, "catalog read failed, serving last known snapshot");
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    /// Returns the store settings, served from cache when fresh.
    ///
    /// Never fails: a read error degrades to the last known snapshot, and
    /// a missing row (fresh install) or unreachable store falls back to
    /// [`StoreSettings::default`].
    pub async fn settings(&self) -> StoreSettings {
        if let Some(settings) = self.settings_cache.get() {
            return settings;
        }

        match self.settings_repo().get().await {
            Ok(Some(settings)) => {
                self.settings_cache.store(settings.clone());
                settings
            }
            Ok(None) => {
                // Fresh install: serve (and cache) the defaults
                let defaults = StoreSettings::default();
                self.settings_cache.store(defaults.clone());
                defaults
            }
            Err(err) => match self.settings_cache.last_known() {
                Some(stale) => {
                    warn!(error = %err, "settings read failed, serving last known snapshot");
                    stale
                }
                None => {
                    warn!(error = %err, "settings read failed, serving defaults");
                    StoreSettings::default()
                }
            },
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::{Category, Money};
    use chrono::Utc;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_settings_default_on_fresh_install() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let settings = db.settings().await;
        assert_eq!(settings, StoreSettings::default());
    }

    #[tokio::test]
    async fn test_catalog_empty_on_fresh_install() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let catalog = db.catalog().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_degrades_to_snapshot_when_pool_closed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let now = Utc::now();
        let gin = Product {
            id: "p-gin".to_string(),
            name: "Malawi Gin 750ml".to_string(),
            category: Category::Spirits,
            price: Money::from_kwacha(45_000),
            cost: Money::from_kwacha(30_000),
            stock: 10,
            barcode: "6001234500017".to_string(),
            low_stock_threshold: 5,
            expires_on: None,
            supplier: None,
            image_ref: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&gin).await.unwrap();

        // Prime the cache, then let a write drop the fresh snapshot
        assert_eq!(db.catalog().await.unwrap().len(), 1);
        db.products().adjust_stock("p-gin", -3).await.unwrap();

        // Kill the pool: the refetch fails, the stale snapshot survives
        db.close().await;

        let catalog = db.catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].stock, 10); // pre-adjustment level
    }

    #[tokio::test]
    async fn test_settings_degrade_to_defaults_when_pool_closed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let settings = db.settings().await;
        assert_eq!(settings, StoreSettings::default());
    }
}
