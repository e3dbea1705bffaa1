//! SQLite entry store
//!
//! One row per day. The `UNIQUE` constraint on `date` backs the
//! one-entry-per-day rule; upserts run inside a single transaction.
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order is date order.
//! Timestamps are RFC 3339 text.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::repository::{EntryRepository, UpsertOutcome};
use crate::storage::types::{Entry, EntryDraft, EntryPatch, Levels};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "id, date, mood, activity, sweet_food, overeating, sleep_recovery, created_at, updated_at";

/// SQLite-backed entry store
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

/// Raw column values of one row, decoded outside the rusqlite closure
struct EntryRow {
    id: String,
    date: String,
    levels: [i64; 5],
    created_at: String,
    updated_at: String,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            levels: [row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = StorageError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StorageError::Corruption(format!("bad id {}: {}", row.id, e)))?;
        let date = parse_date(&row.date)?;

        let level = |v: i64| {
            u8::try_from(v).map_err(|_| StorageError::Corruption(format!("bad level {}", v)))
        };
        let levels = Levels {
            mood: level(row.levels[0])?,
            activity: level(row.levels[1])?,
            sweet_food: level(row.levels[2])?,
            overeating: level(row.levels[3])?,
            sleep_recovery: level(row.levels[4])?,
        };

        Ok(Entry {
            id,
            date,
            levels,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn parse_date(s: &str) -> StorageResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StorageError::Corruption(format!("bad date {}: {}", s, e)))
}

fn parse_timestamp(s: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corruption(format!("bad timestamp {}: {}", s, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl SqliteEntryStore {
    /// Create or open the database at `data_dir/entries.db`
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join("entries.db");

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        Self::init(conn, Some(path))
    }

    /// Private database that lives as long as the store
    pub fn in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL UNIQUE,
                mood INTEGER NOT NULL,
                activity INTEGER NOT NULL,
                sweet_food INTEGER NOT NULL,
                overeating INTEGER NOT NULL,
                sleep_recovery INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        tracing::debug!(path = ?path, "Entry store ready");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

fn query_entries<P: Params>(conn: &Connection, sql: &str, params: P) -> StorageResult<Vec<Entry>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params, EntryRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(Entry::try_from).collect()
}

fn query_entry<P: Params>(conn: &Connection, sql: &str, params: P) -> StorageResult<Option<Entry>> {
    let row = conn
        .prepare_cached(sql)?
        .query_row(params, EntryRow::from_row)
        .optional()?;

    row.map(Entry::try_from).transpose()
}

fn write_levels(conn: &Connection, entry: &Entry) -> StorageResult<()> {
    let l = &entry.levels;
    conn.execute(
        "UPDATE entries
         SET date = ?2, mood = ?3, activity = ?4, sweet_food = ?5,
             overeating = ?6, sleep_recovery = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            entry.id.to_string(),
            format_date(entry.date),
            l.mood,
            l.activity,
            l.sweet_food,
            l.overeating,
            l.sleep_recovery,
            entry.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

#[async_trait]
impl EntryRepository for SqliteEntryStore {
    async fn upsert(&self, draft: EntryDraft) -> StorageResult<UpsertOutcome> {
        draft.levels.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing = query_entry(
            &tx,
            &format!("SELECT {} FROM entries WHERE date = ?1", SELECT_COLUMNS),
            params![format_date(draft.date)],
        )?;

        let outcome = match existing {
            Some(mut entry) => {
                entry.levels = draft.levels;
                entry.updated_at = Utc::now();
                write_levels(&tx, &entry)?;
                UpsertOutcome::Updated(entry)
            }
            None => {
                let entry = Entry::from_draft(draft);
                let l = &entry.levels;
                tx.execute(
                    "INSERT INTO entries (id, date, mood, activity, sweet_food,
                                          overeating, sleep_recovery, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        entry.id.to_string(),
                        format_date(entry.date),
                        l.mood,
                        l.activity,
                        l.sweet_food,
                        l.overeating,
                        l.sleep_recovery,
                        entry.created_at.to_rfc3339(),
                        entry.updated_at.to_rfc3339(),
                    ],
                )?;
                UpsertOutcome::Created(entry)
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Entry>> {
        let conn = self.lock()?;
        query_entry(
            &conn,
            &format!("SELECT {} FROM entries WHERE id = ?1", SELECT_COLUMNS),
            params![id.to_string()],
        )
    }

    async fn list(&self) -> StorageResult<Vec<Entry>> {
        let conn = self.lock()?;
        query_entries(
            &conn,
            &format!("SELECT {} FROM entries ORDER BY date ASC", SELECT_COLUMNS),
            [],
        )
    }

    async fn update(&self, id: Uuid, patch: &EntryPatch) -> StorageResult<Option<Entry>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let Some(current) = query_entry(
            &tx,
            &format!("SELECT {} FROM entries WHERE id = ?1", SELECT_COLUMNS),
            params![id.to_string()],
        )?
        else {
            return Ok(None);
        };

        let updated = patch.apply(&current)?;

        if updated.date != current.date {
            let taken: Option<String> = tx
                .query_row(
                    "SELECT id FROM entries WHERE date = ?1",
                    params![format_date(updated.date)],
                    |row| row.get(0),
                )
                .optional()?;
            if taken.is_some() {
                return Err(StorageError::DateTaken(updated.date));
            }
        }

        write_levels(&tx, &updated)?;
        tx.commit()?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<Option<Entry>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing = query_entry(
            &tx,
            &format!("SELECT {} FROM entries WHERE id = ?1", SELECT_COLUMNS),
            params![id.to_string()],
        )?;

        if existing.is_some() {
            tx.execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
        }
        tx.commit()?;

        Ok(existing)
    }

    async fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<Entry>> {
        if start > end {
            return Err(StorageError::InvalidRange);
        }

        let conn = self.lock()?;
        query_entries(
            &conn,
            &format!(
                "SELECT {} FROM entries WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC",
                SELECT_COLUMNS
            ),
            params![format_date(start), format_date(end)],
        )
    }

    async fn count(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
