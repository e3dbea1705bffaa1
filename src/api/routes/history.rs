//! History Routes
//!
//! - GET /api/v1/history?range=week|month|year - Chart points and averages

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::analytics::{AggregateSummary, Window};
use crate::api::dto::{EntryResponse, HistoryParams, HistoryPoint, HistoryResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// Axis label format for chart points
pub const CHART_DATE_FORMAT: &str = "%b %d";

/// GET /api/v1/history
///
/// Entries inside the trailing window, ascending, with per-metric averages.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<HistoryResponse>> {
    let window = parse_history_range(params.range.as_deref())?;
    let today = state.today();
    let from = window.first_day(today);

    let entries = state.store.find_by_date_range(from, today).await?;

    tracing::debug!(range = %window, from = %from, count = entries.len(), "History query");

    let points = entries
        .iter()
        .map(|e| HistoryPoint {
            entry: EntryResponse::from(e),
            formatted_date: e.date.format(CHART_DATE_FORMAT).to_string(),
        })
        .collect();

    Ok(Json(HistoryResponse {
        range: window,
        from,
        to: today,
        entries: points,
        summary: AggregateSummary::from_entries(&entries),
    }))
}

/// History only offers the three chart ranges; absent means a week
fn parse_history_range(raw: Option<&str>) -> ApiResult<Window> {
    match raw {
        None => Ok(Window::Week),
        Some(s) => match Window::parse(s) {
            Some(w @ (Window::Week | Window::Month | Window::Year)) => Ok(w),
            _ => Err(ApiError::Validation(format!(
                "Invalid range '{}', expected week, month or year",
                s
            ))),
        },
    }
}
