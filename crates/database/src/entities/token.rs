use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Opaque API token bound to a user. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuthToken {
    pub token: String,
    pub user_id: i64,
    pub created_at: String,
    pub expires_at: String,
}
