//! H-Tracker API Server
//!
//! Run with: cargo run --bin htracker-api
//!
//! # Configuration
//!
//! Loaded from the first config file found (see `htracker config`), then
//! overridden by environment variables:
//! - `HTRACKER_DATA_DIR`: Data directory
//! - `HTRACKER_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `HTRACKER_API_PORT`: Port to listen on (default: 8083)
//! - `HTRACKER_LOG_LEVEL`: Log level when `RUST_LOG` is unset (default: info)
//! - `HTRACKER_LOG_FORMAT`: pretty or json

use anyhow::Context;
use htracker::api::{serve, AppState};
use htracker::config::{Config, LoggingConfig, StorageBackend};
use htracker::storage::{EntryRepository, MemoryEntryStore, SqliteEntryStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    init_tracing(&config.logging);

    tracing::info!("Starting H-Tracker API server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn EntryRepository> = match config.storage.backend {
        StorageBackend::Sqlite => {
            let data_dir = config.storage.data_path();
            tracing::info!("Data directory: {:?}", data_dir);

            let store = SqliteEntryStore::open(&data_dir)
                .with_context(|| format!("opening entry store in {:?}", data_dir))?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, entries are lost on shutdown");
            Arc::new(MemoryEntryStore::new())
        }
    };

    let entries = store.count().await.context("counting stored entries")?;
    tracing::info!(backend = store.backend(), entries, "Entry store ready");

    let state = AppState::new(store, config.api.clone());

    tracing::info!("Starting server on {}:{}", config.api.host, config.api.port);
    serve(state, &config.api).await?;

    tracing::info!("H-Tracker API server stopped");

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("htracker={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
