//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{AggregateSummary, Window};
use crate::catalog::MetricKind;
use crate::storage::Entry;

// ============================================
// ENTRY DTOs
// ============================================

/// A metric level as sent by clients: a bare integer or `{value, label}`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LevelInput {
    Value(i64),
    Labeled {
        value: i64,
        /// Ignored, labels always come from the catalog
        #[serde(default)]
        label: Option<String>,
    },
}

impl LevelInput {
    pub fn value(&self) -> i64 {
        match self {
            LevelInput::Value(v) | LevelInput::Labeled { value: v, .. } => *v,
        }
    }
}

/// Body of `POST /entries` and `PUT /entries/:id`
///
/// Every field is optional at the wire level; the create handler insists on
/// all of them, the update handler applies whatever is present.
#[derive(Debug, Default, Deserialize)]
pub struct EntryRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub mood: Option<LevelInput>,
    #[serde(default)]
    pub activity: Option<LevelInput>,
    #[serde(default, alias = "sweetFood")]
    pub sweet_food: Option<LevelInput>,
    #[serde(default)]
    pub overeating: Option<LevelInput>,
    #[serde(default, alias = "sleepRecovery")]
    pub sleep_recovery: Option<LevelInput>,
}

impl EntryRequest {
    pub fn level(&self, metric: MetricKind) -> Option<&LevelInput> {
        match metric {
            MetricKind::Mood => self.mood.as_ref(),
            MetricKind::Activity => self.activity.as_ref(),
            MetricKind::SweetFood => self.sweet_food.as_ref(),
            MetricKind::Overeating => self.overeating.as_ref(),
            MetricKind::SleepRecovery => self.sleep_recovery.as_ref(),
        }
    }
}

/// A level with its catalog label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelView {
    pub value: u8,
    pub label: String,
}

impl LevelView {
    pub fn new(metric: MetricKind, value: u8) -> Self {
        Self {
            value,
            label: metric.label(value).unwrap_or_default().to_string(),
        }
    }
}

/// Entry as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub mood: LevelView,
    pub activity: LevelView,
    pub sweet_food: LevelView,
    pub overeating: LevelView,
    pub sleep_recovery: LevelView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Entry> for EntryResponse {
    fn from(entry: &Entry) -> Self {
        let view = |metric| LevelView::new(metric, entry.value(metric));
        Self {
            id: entry.id,
            date: entry.date,
            mood: view(MetricKind::Mood),
            activity: view(MetricKind::Activity),
            sweet_food: view(MetricKind::SweetFood),
            overeating: view(MetricKind::Overeating),
            sleep_recovery: view(MetricKind::SleepRecovery),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Query parameters for `GET /entries`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Inclusive lower date bound
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

// ============================================
// HISTORY DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// week, month or year; defaults to week
    #[serde(default)]
    pub range: Option<String>,
}

/// One chart point
#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    #[serde(flatten)]
    pub entry: EntryResponse,
    /// Short axis label, e.g. "Oct 19"
    pub formatted_date: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub range: Window,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub entries: Vec<HistoryPoint>,
    /// `None` when the window is empty
    pub summary: Option<AggregateSummary>,
}

// ============================================
// INSIGHT DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct InsightParams {
    /// Scatter x axis, defaults to activity
    #[serde(default)]
    pub x: Option<String>,
    /// Scatter y axis, defaults to sweet_food
    #[serde(default)]
    pub y: Option<String>,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Export format: "csv" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Optional window; everything when absent
    #[serde(default)]
    pub range: Option<String>,
}

fn default_format() -> String {
    "csv".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Storage status: "ok" or "error"
    pub storage: String,
    /// Storage backend name
    pub backend: String,
    /// Number of stored entries, when storage is reachable
    pub entries: Option<usize>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{EntryDraft, Levels};

    #[test]
    fn test_level_input_shapes() {
        let req: EntryRequest = serde_json::from_str(
            r#"{"date":"2026-10-19","mood":6,"activity":{"value":3,"label":"good"},"sweetFood":2}"#,
        )
        .unwrap();

        assert_eq!(req.level(MetricKind::Mood).map(LevelInput::value), Some(6));
        assert_eq!(req.level(MetricKind::Activity).map(LevelInput::value), Some(3));
        assert_eq!(req.level(MetricKind::SweetFood).map(LevelInput::value), Some(2));
        assert!(req.level(MetricKind::Overeating).is_none());
    }

    #[test]
    fn test_entry_response_labels_from_catalog() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let levels = Levels::default()
            .with(MetricKind::Mood, 8)
            .with(MetricKind::SleepRecovery, 6);
        let entry = Entry::from_draft(EntryDraft::new(date, levels).unwrap());

        let response = EntryResponse::from(&entry);
        assert_eq!(response.mood.label, "superb");
        assert_eq!(response.sleep_recovery.label, "fully rested");
        assert_eq!(response.activity.label, "none");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["date"], "2026-10-19");
        assert_eq!(json["mood"]["value"], 8);
    }
}
