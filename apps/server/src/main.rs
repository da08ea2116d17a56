use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use storefront_api::build_router;
use storefront_auth::Registration;
use storefront_config::load as load_config;
use storefront_database::{run_migrations, wait_for_database};
use storefront_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "storefront-backend")]
#[command(about = "Storefront backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Block until the database accepts connections
    WaitForDb,
    /// Create a staff account with superuser rights
    CreateSuperuser(SuperuserArgs),
}

#[derive(Args)]
struct SuperuserArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "")]
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => migrate().await,
        Commands::WaitForDb => wait_for_db().await,
        Commands::CreateSuperuser(args) => create_superuser(args).await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting storefront backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let app = build_router(services.app_state());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(storefront_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let pool = wait_for_database(&config.database).await?;
    run_migrations(&pool)
        .await
        .context("failed to apply database migrations")?;

    info!(url = %config.database.url, "migrations applied");
    Ok(())
}

async fn wait_for_db() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    info!("waiting for database...");
    wait_for_database(&config.database).await?;
    info!("database available");
    Ok(())
}

async fn create_superuser(args: SuperuserArgs) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let user = services
        .create_superuser(&Registration {
            email: args.email,
            username: args.username,
            name: args.name,
            password: args.password,
        })
        .await?;

    println!("superuser '{}' created (id {})", user.username, user.id);
    Ok(())
}
