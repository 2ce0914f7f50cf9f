//! # User Repository
//!
//! Database operations for staff accounts.
//!
//! Usernames are unique and fixed after creation; the login key should
//! not drift out from under the audit trail. Password hashes are set
//! through their own path so a routine profile edit can never blank a
//! credential.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cellar_core::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

const USER_COLUMNS: &str = r#"
    id, username, display_name, password_hash, role, is_active,
    created_at, updated_at
"#;

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, display_name, password_hash, role, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username (the login lookup).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users sorted by username.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Updates a user's profile fields.
    ///
    /// Covers display name, role and active flag. Username and password
    /// hash are deliberately out of reach here.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no user with that ID
    pub async fn update(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, "Updating user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                display_name = ?2,
                role = ?3,
                is_active = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.display_name)
        .bind(user.role)
        .bind(user.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        Ok(())
    }

    /// Replaces a user's password hash.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no user with that ID
    pub async fn set_password_hash(&self, id: &str, password_hash: &str) -> DbResult<()> {
        debug!(id = %id, "Setting password hash");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts active admin accounts.
    ///
    /// The guard against deactivating or demoting the last admin reads
    /// this before applying an update.
    pub async fn count_active_admins(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE role = 'admin' AND is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts all users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cellar_core::Role;
    use uuid::Uuid;

    fn sample_user(username: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: format!("{username} (staff)"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let db = test_db().await;
        let user = sample_user("grace", Role::Cashier);

        db.users().insert(&user).await.unwrap();

        let fetched = db.users().get_by_username("grace").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.role, Role::Cashier);
        assert!(fetched.is_active);
        assert_eq!(fetched.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;

        db.users()
            .insert(&sample_user("grace", Role::Cashier))
            .await
            .unwrap();

        let err = db
            .users()
            .insert(&sample_user("grace", Role::Manager))
            .await
            .unwrap_err();
        assert!(err.is_duplicate(), "expected duplicate error, got {err}");
    }

    #[tokio::test]
    async fn test_update_leaves_credentials_alone() {
        let db = test_db().await;
        let mut user = sample_user("grace", Role::Cashier);
        db.users().insert(&user).await.unwrap();

        user.display_name = "Grace B.".to_string();
        user.role = Role::Manager;
        user.is_active = false;
        // A stale or tampered hash on the struct must not reach the row
        user.password_hash = "not-a-real-hash".to_string();
        db.users().update(&user).await.unwrap();

        let fetched = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.display_name, "Grace B.");
        assert_eq!(fetched.role, Role::Manager);
        assert!(!fetched.is_active);
        assert_eq!(
            fetched.password_hash,
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
        );
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let db = test_db().await;
        let user = sample_user("grace", Role::Cashier);
        db.users().insert(&user).await.unwrap();

        db.users()
            .set_password_hash(&user.id, "$argon2id$new-hash")
            .await
            .unwrap();

        let fetched = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash, "$argon2id$new-hash");
    }

    #[tokio::test]
    async fn test_count_active_admins() {
        let db = test_db().await;

        db.users().insert(&sample_user("owner", Role::Admin)).await.unwrap();
        db.users().insert(&sample_user("grace", Role::Cashier)).await.unwrap();

        let mut retired = sample_user("former", Role::Admin);
        retired.is_active = false;
        db.users().insert(&retired).await.unwrap();

        assert_eq!(db.users().count_active_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_username() {
        let db = test_db().await;

        for name in ["zodwa", "amos", "grace"] {
            db.users()
                .insert(&sample_user(name, Role::Cashier))
                .await
                .unwrap();
        }

        let users = db.users().list_all().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["amos", "grace", "zodwa"]);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = test_db().await;
        let ghost = sample_user("ghost", Role::Cashier);

        let err = db.users().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
