//! H-Tracker Entry Store
//!
//! Persistence for daily entries:
//!
//! - **types**: `Entry`, `Levels`, drafts and patches
//! - **repository**: the `EntryRepository` trait the HTTP layer depends on
//! - **sqlite**: SQLite implementation with a unique date column
//! - **memory**: in-process implementation for tests and throwaway servers
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use htracker::catalog::MetricKind;
//! use htracker::storage::{EntryDraft, EntryRepository, Levels, SqliteEntryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteEntryStore::open(std::path::Path::new("./data"))?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let levels = Levels::default()
//!         .with(MetricKind::Mood, 6)
//!         .with(MetricKind::Activity, 3);
//!
//!     // A second write for the same day overwrites the first
//!     store.upsert(EntryDraft::new(today, levels)?).await?;
//!
//!     println!("{} entries", store.count().await?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryEntryStore;
pub use repository::{EntryRepository, UpsertOutcome};
pub use sqlite::SqliteEntryStore;
pub use types::{Entry, EntryDraft, EntryPatch, Levels};
