//! User repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{normalize_email, NewUser, User, UserChanges};
use crate::types::{DatabaseError, DatabaseResult};

const USER_COLUMNS: &str = "id, email, username, name, password_hash, is_active, is_staff, \
     is_superuser, last_login_at, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user. Duplicate emails or usernames surface as
    /// [`DatabaseError::Duplicate`].
    pub async fn create(&self, user: &NewUser) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, username, name, password_hash, is_active, is_staff, is_superuser, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(user_id = id, superuser = user.is_superuser, "created user");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user"))
    }

    pub async fn update(&self, id: i64, changes: &UserChanges) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let email = changes.email.as_deref().map(normalize_email);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE(?, email),
                username = COALESCE(?, username),
                name = COALESCE(?, name),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(email)
        .bind(&changes.username)
        .bind(&changes.name)
        .bind(&changes.password_hash)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user"));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user"))
    }

    pub async fn set_active(&self, id: i64, active: bool) -> DatabaseResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user"));
        }
        Ok(())
    }

    pub async fn record_login(&self, id: i64) -> DatabaseResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
