//! In-memory entry store
//!
//! Keeps entries in a date-ordered map behind an async RwLock. Used by tests
//! and by the API server when configured with `backend = "memory"`.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::repository::{EntryRepository, UpsertOutcome};
use crate::storage::types::{Entry, EntryDraft, EntryPatch};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Volatile store keyed by date
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RwLock<BTreeMap<NaiveDate, Entry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryStore {
    async fn upsert(&self, draft: EntryDraft) -> StorageResult<UpsertOutcome> {
        draft.levels.validate()?;
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.get_mut(&draft.date) {
            existing.levels = draft.levels;
            existing.updated_at = Utc::now();
            return Ok(UpsertOutcome::Updated(existing.clone()));
        }

        let entry = Entry::from_draft(draft);
        entries.insert(entry.date, entry.clone());
        Ok(UpsertOutcome::Created(entry))
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries.values().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> StorageResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries.values().cloned().collect())
    }

    async fn update(&self, id: Uuid, patch: &EntryPatch) -> StorageResult<Option<Entry>> {
        let mut entries = self.entries.write().await;

        let Some(current) = entries.values().find(|e| e.id == id).cloned() else {
            return Ok(None);
        };

        let updated = patch.apply(&current)?;
        if updated.date != current.date {
            if entries.contains_key(&updated.date) {
                return Err(StorageError::DateTaken(updated.date));
            }
            entries.remove(&current.date);
        }
        entries.insert(updated.date, updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<Option<Entry>> {
        let mut entries = self.entries.write().await;
        let date = entries.values().find(|e| e.id == id).map(|e| e.date);
        Ok(date.and_then(|d| entries.remove(&d)))
    }

    async fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<Entry>> {
        if start > end {
            return Err(StorageError::InvalidRange);
        }
        let entries = self.entries.read().await;
        Ok(entries.range(start..=end).map(|(_, e)| e.clone()).collect())
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.entries.read().await.len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MetricKind;
    use crate::storage::types::Levels;

    fn draft(day: u32, mood: u8) -> EntryDraft {
        EntryDraft::new(
            NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            Levels::default().with(MetricKind::Mood, mood),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_same_date_overwrites() {
        let store = MemoryEntryStore::new();

        let first = store.upsert(draft(5, 3)).await.unwrap();
        assert!(first.is_created());

        let second = store.upsert(draft(5, 7)).await.unwrap();
        assert!(!second.is_created());
        assert_eq!(second.entry().id, first.entry().id);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value(MetricKind::Mood), 7);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_date() {
        let store = MemoryEntryStore::new();
        let a = store.upsert(draft(1, 3)).await.unwrap().into_entry();
        store.upsert(draft(2, 4)).await.unwrap();

        let patch = EntryPatch {
            date: Some(NaiveDate::from_ymd_opt(2026, 10, 2).unwrap()),
            levels: vec![],
        };
        let result = store.update(a.id, &patch).await;
        assert!(matches!(result, Err(StorageError::DateTaken(_))));
    }

    #[tokio::test]
    async fn test_update_moves_date() {
        let store = MemoryEntryStore::new();
        let a = store.upsert(draft(1, 3)).await.unwrap().into_entry();

        let new_date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        let patch = EntryPatch {
            date: Some(new_date),
            levels: vec![],
        };
        let updated = store.update(a.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.date, new_date);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].date, new_date);
    }

    #[tokio::test]
    async fn test_delete_and_range() {
        let store = MemoryEntryStore::new();
        for day in 1..=10 {
            store.upsert(draft(day, 4)).await.unwrap();
        }

        let range = store
            .find_by_date_range(
                NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(range.len(), 3);

        let id = range[0].id;
        assert!(store.delete(id).await.unwrap().is_some());
        assert!(store.delete(id).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 9);
    }
}
