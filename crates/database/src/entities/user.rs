//! User entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{DatabaseError, DatabaseResult};

/// Account row. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated input for inserting a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// Builds a regular account, rejecting an empty email and normalising the
    /// domain part of a present one.
    pub fn new(
        email: &str,
        username: &str,
        name: &str,
        password_hash: String,
    ) -> DatabaseResult<Self> {
        if email.trim().is_empty() {
            return Err(DatabaseError::validation("users must have an email address"));
        }

        Ok(Self {
            email: normalize_email(email),
            username: username.to_string(),
            name: name.to_string(),
            password_hash,
            is_staff: false,
            is_superuser: false,
        })
    }

    pub fn superuser(
        email: &str,
        username: &str,
        name: &str,
        password_hash: String,
    ) -> DatabaseResult<Self> {
        let mut user = Self::new(email, username, name, password_hash)?;
        user.is_staff = true;
        user.is_superuser = true;
        Ok(user)
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Lowercases the domain part of an email address (everything after the last
/// `@`). The local part is kept as typed.
///
/// ```
/// use storefront_database::normalize_email;
///
/// assert_eq!(normalize_email("test@EXAMPLE.com"), "test@example.com");
/// assert_eq!(normalize_email("TEST3@EXAMPLE.COM"), "TEST3@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
