//! Core data types for the entry store
//!
//! - `Levels`: the five metric levels recorded for one day
//! - `Entry`: a stored day with its id and timestamps
//! - `EntryDraft`: a validated day about to be written
//! - `EntryPatch`: a partial update of an existing entry

use crate::catalog::{LevelError, MetricKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One level per metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Levels {
    pub mood: u8,
    pub activity: u8,
    pub sweet_food: u8,
    pub overeating: u8,
    pub sleep_recovery: u8,
}

impl Levels {
    pub fn get(&self, metric: MetricKind) -> u8 {
        match metric {
            MetricKind::Mood => self.mood,
            MetricKind::Activity => self.activity,
            MetricKind::SweetFood => self.sweet_food,
            MetricKind::Overeating => self.overeating,
            MetricKind::SleepRecovery => self.sleep_recovery,
        }
    }

    pub fn set(&mut self, metric: MetricKind, value: u8) {
        match metric {
            MetricKind::Mood => self.mood = value,
            MetricKind::Activity => self.activity = value,
            MetricKind::SweetFood => self.sweet_food = value,
            MetricKind::Overeating => self.overeating = value,
            MetricKind::SleepRecovery => self.sleep_recovery = value,
        }
    }

    /// Builder method: set one level
    pub fn with(mut self, metric: MetricKind, value: u8) -> Self {
        self.set(metric, value);
        self
    }

    /// Check every level against the catalog bounds
    pub fn validate(&self) -> Result<(), LevelError> {
        for &metric in MetricKind::all() {
            metric.check(i64::from(self.get(metric)))?;
        }
        Ok(())
    }
}

/// A stored daily entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    /// Calendar day, unique across the store
    pub date: NaiveDate,
    pub levels: Levels,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a fresh entry from a draft
    pub fn from_draft(draft: EntryDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date: draft.date,
            levels: draft.levels,
            created_at: now,
            updated_at: now,
        }
    }

    /// Level of one metric
    pub fn value(&self, metric: MetricKind) -> u8 {
        self.levels.get(metric)
    }
}

/// A validated day ready to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub levels: Levels,
}

impl EntryDraft {
    pub fn new(date: NaiveDate, levels: Levels) -> Result<Self, LevelError> {
        levels.validate()?;
        Ok(Self { date, levels })
    }
}

/// Partial update of an existing entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub levels: Vec<(MetricKind, u8)>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.levels.is_empty()
    }

    /// Apply the patch to an entry, validating the resulting levels
    pub fn apply(&self, entry: &Entry) -> Result<Entry, LevelError> {
        let mut levels = entry.levels;
        for &(metric, value) in &self.levels {
            levels.set(metric, value);
        }
        levels.validate()?;

        Ok(Entry {
            id: entry.id,
            date: self.date.unwrap_or(entry.date),
            levels,
            created_at: entry.created_at,
            updated_at: Utc::now(),
        })
    }
}
