//! Jobcast Notify Engine - Main Entry Point
//!
//! Composition root: wires the notifiers into the dispatcher and acts as the
//! thin trigger adapter, reading JSON-encoded store change events from stdin
//! (one per line) and dispatching each until EOF or Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use jobcast_core::application::constants::JOBS_COLLECTION;
use jobcast_core::application::{
    ChangeEvent, CustomerNotifier, Dispatcher, TriggerBinding, WorkerNotifier,
};
use jobcast_infra_push::LoggingPushSender;
use jobcast_infra_sqlite::{create_pool, run_migrations, SqliteDocumentStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.jobcast/store.db";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format = std::env::var("JOBCAST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Jobcast Notify Engine v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("JOBCAST_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    info!(db_path = %db_path, "Initializing document store...");

    // 3. Initialize document store
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let store = Arc::new(SqliteDocumentStore::new(pool));
    let sender = Arc::new(LoggingPushSender::new());

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        TriggerBinding::created(JOBS_COLLECTION),
        Arc::new(WorkerNotifier::new(store.clone(), sender.clone())),
    );
    dispatcher.register(
        TriggerBinding::updated(JOBS_COLLECTION),
        Arc::new(CustomerNotifier::new(store.clone(), sender.clone())),
    );

    info!("System ready. Reading change events from stdin...");
    info!("Press Ctrl+C to shutdown");

    // 5. Event loop: one dispatched event per input line
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ChangeEvent>(line) {
                            Ok(event) => dispatcher.dispatch(&event).await,
                            Err(e) => warn!(error = %e, "Skipping malformed change event"),
                        }
                    }
                    None => {
                        info!("Event stream closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting gracefully...");
                break;
            }
        }
    }

    info!("Shutdown complete.");

    Ok(())
}
