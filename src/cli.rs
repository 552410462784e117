use actix_web::{middleware::Logger, App, HttpServer};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::config::{Config, ConfigError};
use crate::db;
use crate::shutdown::ShutdownCoordinator;

const APP_NAME: &str = "job-board";

#[derive(Parser)]
#[command(name = "job-board", about = "REST service for job postings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn run() -> Result<(), StartupError> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    crate::logging::init(&config.log_dir)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(config).await,
    }
}

async fn migrate(config: Config) -> Result<(), StartupError> {
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections).await?;
    db::migrations::run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn serve(config: Config) -> Result<(), StartupError> {
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections).await?;

    info!("Starting {} application", APP_NAME);
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool).await?;

    let state = AppState::new(APP_NAME, config.admin_token.clone());
    if state.admin_token().is_none() {
        warn!("ADMIN_TOKEN is not set; admin routes will reject every request");
    }

    let app_config = crate::configure_app(pool.clone(), state, config.max_payload_size);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(app_config.clone())
    })
    .disable_signals()
    .bind((config.host.as_str(), config.port))?
    .run();

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await?;
    Ok(())
}
