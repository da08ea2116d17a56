//! Database connection management

use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use storefront_config::DatabaseConfig;
use tokio::fs;
use tracing::{info, warn};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection pool with foreign keys enforced.
pub async fn prepare_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    ensure_sqlite_path(&config.url).await?;

    let in_memory = is_memory_url(&config.url);
    let mut options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database url {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // every in-memory connection is its own database
    let max_connections = if in_memory { 1 } else { config.max_connections.max(1) };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // the database lives only as long as its single connection
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database {}", config.url))?;

    info!(url = %config.url, "database connection established");
    Ok(pool)
}

/// Opens the database, retrying until it answers a trivial query or the
/// configured number of attempts runs out.
pub async fn wait_for_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = retry_until_ready(config.connect_attempts, config.retry_interval(), || {
        probe_database(config)
    })
    .await?;

    info!("database available");
    Ok(pool)
}

async fn probe_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database did not answer readiness probe")?;
    Ok(pool)
}

/// Runs `probe` up to `attempts` times (at least once), sleeping `interval`
/// between failures. Returns the first success or the last error.
pub async fn retry_until_ready<T, E, F, Fut>(
    attempts: u32,
    interval: Duration,
    mut probe: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match probe().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                warn!(attempt, attempts, error = %err, "database unavailable, waiting");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
        }
    }
}

fn sqlite_path(url: &str) -> Option<&str> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    // strip query parameters such as ?mode=rwc
    Some(path.split('?').next().unwrap_or(path))
}

fn is_memory_url(url: &str) -> bool {
    matches!(sqlite_path(url), Some(path) if path.is_empty() || path.contains(":memory:"))
}

/// Ensures the parent directory of a file-backed SQLite database exists.
async fn ensure_sqlite_path(url: &str) -> Result<()> {
    if is_memory_url(url) {
        return Ok(());
    }
    let Some(sqlite_path) = sqlite_path(url) else {
        return Ok(());
    };

    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create sqlite directory {}", parent.display())
            })?;
        }
    }

    Ok(())
}
