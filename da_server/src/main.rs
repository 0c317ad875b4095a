//! Duel server: one duel actor behind an HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use da_server::{
    api,
    config::{ServerConfig, StorageBackend},
    logging,
};
use duel_arena::{
    db::Database,
    duel::{DuelActor, DuelManager, StaticDealerRoster},
    records::{
        InMemoryMatchRecordRepository, MatchRecordManager, MatchRecordRepository,
        PgMatchRecordRepository,
    },
};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the wagered duel server

USAGE:
  da_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/duel_db]

FLAGS:
  --memory                 Keep match records in memory only
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORAGE_BACKEND          postgres (default) or memory
  DATABASE_URL             PostgreSQL connection string
  DEALER_IDS               Comma-separated user ids allowed to deal
  DUEL_COMMISSION_BPS      Commission in basis points [default: 500]
  LEADERBOARD_PAGE_SIZE    Users per leaderboard page [default: 10]
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        memory: pargs.contains("--memory"),
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.memory)?;
    config.validate()?;

    info!(
        "Starting duel server at {} (storage: {}, {} dealer(s))",
        config.bind,
        config.storage,
        config.dealer_ids.len()
    );
    if config.dealer_ids.is_empty() {
        tracing::warn!("DEALER_IDS is empty; no duel can be started");
    }

    let (repository, database): (Arc<dyn MatchRecordRepository>, Option<Database>) =
        match config.storage {
            StorageBackend::Memory => (Arc::new(InMemoryMatchRecordRepository::new()), None),
            StorageBackend::Postgres => {
                let db = Database::new(&config.database)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
                let repository = PgMatchRecordRepository::new(db.pool().clone());
                repository.ensure_schema().await?;
                info!("Database connected successfully");
                (Arc::new(repository), Some(db))
            }
        };

    let records = MatchRecordManager::new(repository, config.duel.commission());
    let roster = StaticDealerRoster::new(config.dealer_ids.iter().copied());
    let manager = DuelManager::new(records.clone(), Arc::new(roster));
    let (actor, duels) = DuelActor::new(manager, config.duel.inbox_capacity);
    let actor_task = tokio::spawn(actor.run());

    let app = api::create_router(api::AppState {
        duels: duels.clone(),
        records,
        leaderboard_page_size: config.duel.leaderboard_page_size,
        storage: config.storage.to_string(),
        database: database.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    if duels.close().await.is_ok() {
        actor_task.await?;
    }
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
}
