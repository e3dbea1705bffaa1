//! Export Routes
//!
//! Data export endpoint for backup and analysis.
//!
//! - GET /api/v1/export - Download entries as CSV or JSON

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::analytics::Window;
use crate::api::dto::{EntryResponse, ExportParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::Entry;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn parse(s: &str) -> ApiResult<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ApiError::Validation(format!(
                "Unsupported export format '{}', expected csv or json",
                other
            ))),
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// GET /api/v1/export
///
/// Export entries, ascending by date. `range` limits the export to a
/// trailing window; without it everything is exported.
pub async fn export_entries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    if !state.config.enable_export {
        return Err(ApiError::Validation(
            "Export feature is disabled".to_string(),
        ));
    }

    let format = ExportFormat::parse(&params.format)?;

    let entries = match params.range.as_deref() {
        None => state.store.list().await?,
        Some(raw) => {
            let window = Window::parse(raw)
                .ok_or_else(|| ApiError::Validation(format!("Invalid range '{}'", raw)))?;
            let today = state.today();
            state
                .store
                .find_by_date_range(window.first_day(today), today)
                .await?
        }
    };

    let body = match format {
        ExportFormat::Csv => format_csv(&entries)?,
        ExportFormat::Json => format_json(&entries)?,
    };

    tracing::info!(
        format = format.extension(),
        entries = entries.len(),
        "Exported entries"
    );

    let filename = format!(
        "htracker_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

/// One CSV row; the level columns match what the CSV importer reads
#[derive(Serialize)]
struct ExportRow {
    id: Uuid,
    date: NaiveDate,
    mood: u8,
    activity: u8,
    sweet_food: u8,
    overeating: u8,
    sleep_recovery: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Entry> for ExportRow {
    fn from(e: &Entry) -> Self {
        Self {
            id: e.id,
            date: e.date,
            mood: e.levels.mood,
            activity: e.levels.activity,
            sweet_food: e.levels.sweet_food,
            overeating: e.levels.overeating,
            sleep_recovery: e.levels.sleep_recovery,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

fn format_csv(entries: &[Entry]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer
            .serialize(ExportRow::from(entry))
            .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))
}

fn format_json(entries: &[Entry]) -> ApiResult<String> {
    let rendered: Vec<EntryResponse> = entries.iter().map(EntryResponse::from).collect();
    serde_json::to_string_pretty(&rendered)
        .map_err(|e| ApiError::Internal(format!("JSON encoding failed: {}", e)))
}
