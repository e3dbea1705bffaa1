//! # H-Tracker
//!
//! Personal daily tracker: one entry per calendar day with five ordinal
//! wellbeing levels, served over a JSON API together with trailing-window
//! averages, a day-of-week breakdown and plain-language insights.
//!
//! ## Modules
//!
//! - [`catalog`]: Metric option lists and level bounds
//! - [`storage`]: Entry store (SQLite and in-memory) behind a repository trait
//! - [`analytics`]: Pure aggregation and insight engine
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//! - [`import`]: CSV import
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use htracker::analytics::InsightReport;
//! use htracker::catalog::MetricKind;
//! use htracker::storage::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteEntryStore::open(std::path::Path::new("./htracker_data"))?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let levels = Levels::default()
//!         .with(MetricKind::Mood, 6)
//!         .with(MetricKind::Activity, 3)
//!         .with(MetricKind::SleepRecovery, 5);
//!     store.upsert(EntryDraft::new(today, levels)?).await?;
//!
//!     let report = InsightReport::build(&store.list().await?, today);
//!     println!("{}", report.insight);
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod catalog;
pub mod config;
pub mod import;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    Entry, EntryDraft, EntryPatch, EntryRepository, Levels, MemoryEntryStore, SqliteEntryStore,
    StorageError, StorageResult, UpsertOutcome,
};

pub use catalog::{catalog, LevelError, MetricKind, MetricOption};

pub use analytics::{
    select_window, synthesize_insight, AggregateSummary, DayOfWeekBreakdown, InsightReport,
    Window,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, StorageBackend, StorageConfig};

pub use import::{CsvImportResult, CsvImporter, ImportError};
