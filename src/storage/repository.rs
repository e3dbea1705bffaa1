//! Entry repository interface
//!
//! The HTTP layer only sees this trait, so handlers and the aggregation
//! engine can be exercised against the in-memory store without a database.

use crate::storage::error::StorageResult;
use crate::storage::types::{Entry, EntryDraft, EntryPatch};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Result of writing a draft for a date
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// No entry existed for the date
    Created(Entry),
    /// The entry for the date was overwritten in place
    Updated(Entry),
}

impl UpsertOutcome {
    pub fn entry(&self) -> &Entry {
        match self {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) => e,
        }
    }

    pub fn into_entry(self) -> Entry {
        match self {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) => e,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

/// Persistence capability for daily entries
///
/// Implementations must keep at most one entry per date.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Create the entry for `draft.date`, or overwrite the existing one
    async fn upsert(&self, draft: EntryDraft) -> StorageResult<UpsertOutcome>;

    /// Fetch one entry by id
    async fn get(&self, id: Uuid) -> StorageResult<Option<Entry>>;

    /// All entries, ascending by date
    async fn list(&self) -> StorageResult<Vec<Entry>>;

    /// Apply a partial update; `None` when the id is unknown
    async fn update(&self, id: Uuid, patch: &EntryPatch) -> StorageResult<Option<Entry>>;

    /// Delete by id; returns the removed entry
    async fn delete(&self, id: Uuid) -> StorageResult<Option<Entry>>;

    /// Entries with `start <= date <= end`, ascending by date
    async fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<Entry>>;

    /// Number of stored entries
    async fn count(&self) -> StorageResult<usize>;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;
}
