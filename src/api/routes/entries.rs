//! Entry Routes
//!
//! CRUD endpoints for daily entries.
//!
//! - GET /api/v1/entries - List entries, newest first
//! - POST /api/v1/entries - Record a day (overwrites an existing entry for that date)
//! - GET /api/v1/entries/:id - Get one entry
//! - PUT /api/v1/entries/:id - Partially update an entry
//! - DELETE /api/v1/entries/:id - Delete an entry

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{DeleteResponse, EntryRequest, EntryResponse, ListParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::catalog::MetricKind;
use crate::storage::{EntryDraft, EntryPatch, Levels};

/// Open-ended bounds stay within four-digit years so stored text sorts correctly
const EARLIEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(d) => d,
    None => NaiveDate::MIN,
};
const LATEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
    Some(d) => d,
    None => NaiveDate::MAX,
};

/// GET /api/v1/entries
///
/// List entries, newest date first. `from` and `to` narrow the list to an
/// inclusive date range.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<EntryResponse>>> {
    let mut entries = match (params.from, params.to) {
        (None, None) => state.store.list().await?,
        (from, to) => {
            let start = from.unwrap_or(EARLIEST_DATE);
            let end = to.unwrap_or(LATEST_DATE);
            if start > end {
                return Err(ApiError::Validation("from must not be after to".to_string()));
            }
            state.store.find_by_date_range(start, end).await?
        }
    };

    entries.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(Json(entries.iter().map(EntryResponse::from).collect()))
}

/// GET /api/v1/entries/:id
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EntryResponse>> {
    let id = parse_entry_id(&id)?;

    let entry = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    Ok(Json(EntryResponse::from(&entry)))
}

/// POST /api/v1/entries
///
/// Record the levels for a date. Returns 201 when the date was new and 200
/// when an existing entry was overwritten.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    let Json(req) = payload?;
    let draft = draft_from_request(&req)?;

    let outcome = state.store.upsert(draft).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let entry = outcome.into_entry();
    tracing::info!(
        entry_id = %entry.id,
        date = %entry.date,
        created = status == StatusCode::CREATED,
        "Recorded entry"
    );

    Ok((status, Json(EntryResponse::from(&entry))))
}

/// PUT /api/v1/entries/:id
///
/// Apply any subset of date and metric levels to an existing entry.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> ApiResult<Json<EntryResponse>> {
    let id = parse_entry_id(&id)?;
    let Json(req) = payload?;
    let patch = patch_from_request(&req)?;

    // A date owned by another entry surfaces as StorageError::DateTaken (409)
    let updated = state
        .store
        .update(id, &patch)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    tracing::info!(entry_id = %id, date = %updated.date, "Updated entry");

    Ok(Json(EntryResponse::from(&updated)))
}

/// DELETE /api/v1/entries/:id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_entry_id(&id)?;

    let removed = state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    tracing::info!(entry_id = %id, date = %removed.date, "Deleted entry");

    Ok(Json(DeleteResponse {
        message: "Entry deleted successfully".to_string(),
    }))
}

// ============================================
// Request parsing
// ============================================

/// Malformed ids cannot name an entry, so they are reported as missing
fn parse_entry_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("Entry {} not found", raw)))
}

fn entry_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Entry {} not found", id))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its own calendar day)
pub fn parse_entry_date(raw: &str) -> ApiResult<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| ApiError::Validation(format!("Invalid date '{}'", raw)))
}

fn draft_from_request(req: &EntryRequest) -> ApiResult<EntryDraft> {
    let date = req
        .date
        .as_deref()
        .ok_or_else(|| ApiError::Validation("date is required".to_string()))?;
    let date = parse_entry_date(date)?;

    let mut levels = Levels::default();
    for &metric in MetricKind::all() {
        let input = req
            .level(metric)
            .ok_or_else(|| ApiError::Validation(format!("{} is required", metric)))?;
        let value = metric
            .check(input.value())
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        levels.set(metric, value);
    }

    EntryDraft::new(date, levels).map_err(|e| ApiError::Validation(e.to_string()))
}

fn patch_from_request(req: &EntryRequest) -> ApiResult<EntryPatch> {
    let date = req.date.as_deref().map(parse_entry_date).transpose()?;

    let mut levels = Vec::new();
    for &metric in MetricKind::all() {
        if let Some(input) = req.level(metric) {
            let value = metric
                .check(input.value())
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            levels.push((metric, value));
        }
    }

    let patch = EntryPatch { date, levels };
    if patch.is_empty() {
        return Err(ApiError::Validation(
            "Update must contain a date or at least one metric".to_string(),
        ));
    }

    Ok(patch)
}
