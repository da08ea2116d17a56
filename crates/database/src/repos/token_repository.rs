use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::entities::AuthToken;
use crate::types::DatabaseResult;

#[derive(Clone)]
pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DatabaseResult<AuthToken> {
        let record = AuthToken {
            token: token.to_string(),
            user_id,
            created_at: Utc::now().to_rfc3339(),
            expires_at: expires_at.to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(&record.created_at)
        .bind(&record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find(&self, token: &str) -> DatabaseResult<Option<AuthToken>> {
        let record = sqlx::query_as::<_, AuthToken>(
            "SELECT token, user_id, created_at, expires_at FROM auth_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, token: &str) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
