use anyhow::{Context, Result};
use sqlx::SqlitePool;
use storefront_api::AppState;
use storefront_auth::{Authenticator, Registration, User};
use storefront_config::AppConfig;
use storefront_database::{run_migrations, wait_for_database};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Installs the global fmt subscriber. `RUST_LOG` overrides the default
    /// `info` filter.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
}

impl BackendServices {
    /// Waits for the database, applies migrations and wires up the
    /// authenticator.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = wait_for_database(&config.database)
            .await
            .context("database did not become available")?;

        run_migrations(&db_pool)
            .await
            .context("failed to apply database migrations")?;

        let authenticator = Authenticator::new(db_pool.clone(), config.auth.clone());
        info!(
            token_ttl_seconds = authenticator.token_ttl().num_seconds(),
            "authenticator ready"
        );

        Ok(Self {
            db_pool,
            authenticator,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.db_pool.clone(), self.authenticator.clone())
    }

    pub async fn create_superuser(&self, registration: &Registration) -> Result<User> {
        let user = self
            .authenticator
            .create_superuser(registration)
            .await
            .context("failed to create superuser")?;

        info!(user_id = user.id, username = %user.username, "created superuser");
        Ok(user)
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
