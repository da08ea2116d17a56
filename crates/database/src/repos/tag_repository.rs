//! Owner-scoped tag storage.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::entities::{validate_name, Tag};
use crate::types::{DatabaseError, DatabaseResult};

#[derive(Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's tags ordered by name, then id.
    pub async fn list_for_owner(&self, owner_id: i64) -> DatabaseResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name FROM tags WHERE user_id = ? ORDER BY name ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn find_for_owner(&self, owner_id: i64, id: i64) -> DatabaseResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name FROM tags WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    /// Creates a tag; an existing `(owner, name)` pair is reported as
    /// [`DatabaseError::Duplicate`].
    pub async fn create(&self, owner_id: i64, name: &str) -> DatabaseResult<Tag> {
        let name = validate_name("name", name)?;

        let result = sqlx::query("INSERT INTO tags (user_id, name, created_at) VALUES (?, ?, ?)")
            .bind(owner_id)
            .bind(&name)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            user_id: owner_id,
            name,
        })
    }

    pub async fn update(&self, owner_id: i64, id: i64, name: &str) -> DatabaseResult<Tag> {
        let name = validate_name("name", name)?;

        let result = sqlx::query("UPDATE tags SET name = ? WHERE id = ? AND user_id = ?")
            .bind(&name)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("tag"));
        }

        Ok(Tag {
            id,
            user_id: owner_id,
            name,
        })
    }

    /// Deletes a tag. Product associations go with it; products stay.
    pub async fn delete(&self, owner_id: i64, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("tag"));
        }

        Ok(())
    }

    pub async fn count_for_owner(&self, owner_id: i64) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE user_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Returns the owner's tag called `name`, inserting it first if needed.
    /// Runs on the caller's connection so it can join an open transaction.
    pub async fn get_or_create(
        conn: &mut SqliteConnection,
        owner_id: i64,
        name: &str,
    ) -> DatabaseResult<Tag> {
        let name = validate_name("tag name", name)?;

        sqlx::query(
            r#"
            INSERT INTO tags (user_id, name, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, name) DO NOTHING
            "#,
        )
        .bind(owner_id)
        .bind(&name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *conn)
        .await?;

        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name FROM tags WHERE user_id = ? AND name = ?",
        )
        .bind(owner_id)
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;

        Ok(tag)
    }
}
