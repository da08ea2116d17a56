//! Storefront Database Crate
//!
//! Connection management, embedded migrations, entities and the owner-scoped
//! repositories behind the storefront API.

use sqlx::SqlitePool;
use storefront_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, retry_until_ready, wait_for_database};
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{ProductRepository, TagRepository, TokenRepository, UserRepository};

pub use entities::{
    normalize_email, price_from_cents, price_to_cents, validate_name, AuthToken, NewProduct,
    NewUser, Product, ProductChanges, Tag, User, UserChanges,
};

pub use types::{DatabaseError, DatabaseResult};

/// Waits for the database to come up, then applies pending migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = wait_for_database(config)
        .await
        .map_err(|e| DatabaseError::Connection(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("{e:#}")))?;

    Ok(pool)
}
