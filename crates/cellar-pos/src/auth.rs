//! # Staff Identity
//!
//! Login, session tokens, and account administration for the local
//! user table.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        login(username, password)                        │
//! │                                                                         │
//! │  secret configured? ──no──► Misconfigured (nothing probed)              │
//! │        │                                                                │
//! │  locked out? ───────yes──► RateLimited { retry_after_secs }             │
//! │        │                                                                │
//! │  username exists? ──no───► count a failure ──► InvalidCredentials       │
//! │        │                                                                │
//! │  account active? ───no───► AccountDisabled                              │
//! │        │                                                                │
//! │  password verifies? ─no──► count a failure ──► InvalidCredentials       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  clear failures, sign token, audit "user.login" ──► AuthSession         │
//! │                                                                         │
//! │  Unknown usernames and wrong passwords produce the same error; the      │
//! │  register never confirms which half was wrong.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lockout
//! Failures are tracked in memory per username. After too many the
//! username is locked for a fixed window; restarts clear the slate,
//! which is acceptable for a single till in a small shop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit;
use crate::config::AppConfig;
use crate::error::PosError;
use cellar_core::validation::{validate_display_name, validate_password, validate_username};
use cellar_core::{Role, Severity, User};
use cellar_db::Database;

/// Default admin account created on a fresh installation.
///
/// The first run of the application bootstraps this account so the shop
/// owner can sign in at all; the UI nags until the password is changed.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// =============================================================================
// Errors
// =============================================================================

/// Login and session errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Too many failures for this username; locked out for a while.
    #[error("Rate limited, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Account exists, password may even be right, but the account is off.
    #[error("Account disabled")]
    AccountDisabled,

    /// Identity layer cannot run (missing token secret).
    #[error("Auth misconfigured: {0}")]
    Misconfigured(String),

    /// Storage failure while looking up the account.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Hashing or token signing failed.
    #[error("Internal auth error: {0}")]
    Internal(String),
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
///
/// A malformed hash verifies as false rather than erroring; the row is
/// unusable either way and the caller treats it as a wrong password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Username at sign-in time
    pub username: String,

    /// Role at sign-in time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Unique identifier for this token
    pub jti: String,
}

/// What a successful login hands back to the register.
///
/// The user's `password_hash` is skipped on serialization, so this is
/// safe to pass across the UI boundary as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// New staff account request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

// =============================================================================
// AuthService
// =============================================================================

/// Per-username failure tracking for the lockout window.
#[derive(Debug, Default)]
struct FailureWindow {
    failures: u32,
    locked_until: Option<Instant>,
}

/// Identity service: login, token verification, account administration.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt_secret: String,
    session_lifetime_secs: i64,
    max_failures: u32,
    lockout: Duration,
    failures: Arc<Mutex<HashMap<String, FailureWindow>>>,
}

impl AuthService {
    /// Creates a new identity service.
    pub fn new(db: Database, config: &AppConfig) -> Self {
        AuthService {
            db,
            jwt_secret: config.jwt_secret.clone(),
            session_lifetime_secs: config.session_lifetime_secs,
            max_failures: config.max_login_failures,
            lockout: Duration::from_secs(config.lockout_secs),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Authenticates a staff member and issues a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let username = username.trim();
        info!(username = %username, "Login attempt");

        if self.jwt_secret.is_empty() {
            return Err(AuthError::Misconfigured(
                "CELLAR_JWT_SECRET is empty".to_string(),
            ));
        }

        self.check_lockout(username)?;

        let user = self
            .db
            .users()
            .get_by_username(username)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let user = match user {
            Some(u) => u,
            None => {
                warn!(username = %username, "Login failed: unknown username");
                self.record_failure(username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.is_active {
            warn!(username = %username, "Login failed: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        if !verify_password(password, &user.password_hash) {
            warn!(username = %username, "Login failed: wrong password");
            self.record_failure(username);
            return Err(AuthError::InvalidCredentials);
        }

        self.clear_failures(username);

        let now = Utc::now();
        let (token, expires_at) = self.issue_token(&user, now)?;

        audit::record(
            &self.db,
            audit::entry(
                &user.display_name,
                "user.login",
                format!("{} signed in", user.username),
                Severity::Info,
            ),
        )
        .await;

        info!(username = %user.username, role = ?user.role, "Login successful");

        Ok(AuthSession {
            user,
            token,
            expires_at,
        })
    }

    /// Validates a session token and returns its claims.
    ///
    /// Bad signatures, garbage, and expired tokens all come back as
    /// `InvalidCredentials`; the register reacts the same way to each
    /// (back to the login screen).
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::Misconfigured(
                "CELLAR_JWT_SECRET is empty".to_string(),
            ));
        }

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(token_data.claims)
    }

    /// Creates the default admin account when the user table is empty.
    ///
    /// Called once at startup. Returns the created account, or `None`
    /// when staff accounts already exist.
    pub async fn ensure_bootstrap_admin(&self) -> Result<Option<User>, PosError> {
        if self.db.users().count().await? > 0 {
            return Ok(None);
        }

        warn!(
            username = DEFAULT_ADMIN_USERNAME,
            "No staff accounts found; creating the default admin"
        );

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            display_name: "Administrator".to_string(),
            password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
            role: Role::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.users().insert(&user).await?;

        audit::record(
            &self.db,
            audit::entry(
                &user.display_name,
                "user.bootstrapped",
                "Default admin account created on first run".to_string(),
                Severity::Warning,
            ),
        )
        .await;

        Ok(Some(user))
    }

    // -------------------------------------------------------------------------
    // Account administration
    // -------------------------------------------------------------------------

    /// Creates a staff account.
    pub async fn create_user(&self, new_user: NewUser, actor: &User) -> Result<User, PosError> {
        validate_username(&new_user.username)?;
        validate_display_name(&new_user.display_name)?;
        validate_password(&new_user.password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.trim().to_string(),
            display_name: new_user.display_name.trim().to_string(),
            password_hash: hash_password(&new_user.password)?,
            role: new_user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.users().insert(&user).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "user.created",
                format!("Created {} account '{}'", user.role.as_str(), user.username),
                Severity::Info,
            ),
        )
        .await;

        info!(username = %user.username, role = ?user.role, "Staff account created");

        Ok(user)
    }

    /// Changes an account's role.
    ///
    /// Refuses to demote the last active admin; someone must always be
    /// able to manage accounts.
    pub async fn set_role(&self, user_id: &str, role: Role, actor: &User) -> Result<User, PosError> {
        let mut user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| PosError::not_found("User", user_id))?;

        if user.role == Role::Admin && role != Role::Admin && user.is_active {
            self.ensure_not_last_admin("Cannot demote the last active admin")
                .await?;
        }

        let previous = user.role;
        user.role = role;
        self.db.users().update(&user).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "user.role_changed",
                format!(
                    "Changed '{}' from {} to {}",
                    user.username,
                    previous.as_str(),
                    role.as_str()
                ),
                Severity::Info,
            ),
        )
        .await;

        Ok(user)
    }

    /// Enables or disables an account.
    ///
    /// Disabled accounts fail login but keep their audit history. The
    /// last active admin cannot be disabled.
    pub async fn set_active(
        &self,
        user_id: &str,
        active: bool,
        actor: &User,
    ) -> Result<User, PosError> {
        let mut user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| PosError::not_found("User", user_id))?;

        if user.role == Role::Admin && user.is_active && !active {
            self.ensure_not_last_admin("Cannot disable the last active admin")
                .await?;
        }

        user.is_active = active;
        self.db.users().update(&user).await?;

        let (action, detail) = if active {
            ("user.enabled", "Enabled")
        } else {
            ("user.disabled", "Disabled")
        };
        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                action,
                format!("{} account '{}'", detail, user.username),
                Severity::Warning,
            ),
        )
        .await;

        Ok(user)
    }

    /// Sets a new password for an account.
    pub async fn change_password(
        &self,
        user_id: &str,
        new_password: &str,
        actor: &User,
    ) -> Result<(), PosError> {
        validate_password(new_password)?;

        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| PosError::not_found("User", user_id))?;

        let hash = hash_password(new_password)?;
        self.db.users().set_password_hash(&user.id, &hash).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "user.password_changed",
                format!("Changed password for '{}'", user.username),
                Severity::Info,
            ),
        )
        .await;

        Ok(())
    }

    /// Lists all staff accounts.
    pub async fn list_users(&self) -> Result<Vec<User>, PosError> {
        Ok(self.db.users().list_all().await?)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn ensure_not_last_admin(&self, message: &str) -> Result<(), PosError> {
        if self.db.users().count_active_admins().await? <= 1 {
            return Err(PosError::business(message));
        }
        Ok(())
    }

    fn issue_token(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let expires_at = now + chrono::Duration::seconds(self.session_lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok((token, expires_at))
    }

    fn check_lockout(&self, username: &str) -> Result<(), AuthError> {
        let mut failures = self.failures.lock().expect("Failure map mutex poisoned");

        if let Some(window) = failures.get(username) {
            if let Some(until) = window.locked_until {
                let now = Instant::now();
                if now < until {
                    let retry_after_secs = (until - now).as_secs().max(1);
                    return Err(AuthError::RateLimited { retry_after_secs });
                }
                // Lockout expired; forget the old window
                failures.remove(username);
            }
        }

        Ok(())
    }

    fn record_failure(&self, username: &str) {
        let mut failures = self.failures.lock().expect("Failure map mutex poisoned");
        let window = failures.entry(username.to_string()).or_default();
        window.failures += 1;

        if window.failures >= self.max_failures {
            window.locked_until = Some(Instant::now() + self.lockout);
            warn!(
                username = %username,
                failures = window.failures,
                "Username locked out after repeated failures"
            );
        }
    }

    fn clear_failures(&self, username: &str) {
        self.failures
            .lock()
            .expect("Failure map mutex poisoned")
            .remove(username);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
