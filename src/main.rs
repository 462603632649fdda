use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rock_api::config::{AppConfig, StoreBackend};
use rock_api::database::{schema, DatabaseManager, MemoryStore, PgStore, RecordStore};
use rock_api::AppState;

#[derive(Parser)]
#[command(name = "rock-api")]
#[command(about = "Rock collection API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on")]
        port: Option<u16>,

        #[arg(long, help = "Record store backend: postgres or memory")]
        store: Option<StoreBackend>,
    },

    #[command(about = "Create tables and seed rock types, then exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rock_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = rock_api::config::config().clone();

    match cli.command.unwrap_or(Commands::Serve { port: None, store: None }) {
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            schema::migrate(&pool).await?;
            Ok(())
        }
        Commands::Serve { port, store } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(store) = store {
                config.database.store = store;
            }
            serve(config).await
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Rock API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn RecordStore> = match config.database.store {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            schema::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let app = rock_api::app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Rock API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Rock API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
