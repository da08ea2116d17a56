//! Tag entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Owner-scoped label. `(user_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}
