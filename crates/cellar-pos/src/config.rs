//! Service layer configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Runtime configuration for a register terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file path
    pub database_path: PathBuf,

    /// Secret key for signing session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    pub session_lifetime_secs: i64,

    /// Receipt line width in characters
    pub receipt_width: usize,

    /// Failed logins per username before lockout
    pub max_login_failures: u32,

    /// Lockout duration in seconds after too many failures
    pub lockout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            // Matches the seed tool's default so a seeded dev catalog is
            // picked up without any configuration
            database_path: env::var("CELLAR_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./cellar_dev.db")),

            jwt_secret: env::var("CELLAR_JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback. Production installs MUST set this;
                // the empty string is rejected at login time.
                "cellar-pos-dev-secret-change-in-production".to_string()
            }),

            session_lifetime_secs: env::var("CELLAR_SESSION_LIFETIME_SECS")
                .unwrap_or_else(|_| "43200".to_string()) // 12 hours, one shift
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CELLAR_SESSION_LIFETIME_SECS".to_string()))?,

            receipt_width: env::var("CELLAR_RECEIPT_WIDTH")
                .unwrap_or_else(|_| "40".to_string()) // 58mm thermal roll
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CELLAR_RECEIPT_WIDTH".to_string()))?,

            max_login_failures: env::var("CELLAR_MAX_LOGIN_FAILURES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CELLAR_MAX_LOGIN_FAILURES".to_string()))?,

            lockout_secs: env::var("CELLAR_LOCKOUT_SECS")
                .unwrap_or_else(|_| "300".to_string()) // 5 minutes
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CELLAR_LOCKOUT_SECS".to_string()))?,
        };

        // Narrower than this and the two-column receipt layout collapses
        if config.receipt_width < 20 {
            return Err(ConfigError::InvalidValue(
                "CELLAR_RECEIPT_WIDTH".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
