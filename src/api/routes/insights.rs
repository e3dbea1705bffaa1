//! Insight Routes
//!
//! - GET /api/v1/insights - Three-month report with insight text

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::analytics::InsightReport;
use crate::api::dto::InsightParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::catalog::MetricKind;

/// GET /api/v1/insights
///
/// Builds the report from every stored entry; the engine applies the window.
/// `x` and `y` pick the scatter axes (activity vs sweet food by default).
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightParams>,
) -> ApiResult<Json<InsightReport>> {
    let x = parse_axis(params.x.as_deref(), MetricKind::Activity)?;
    let y = parse_axis(params.y.as_deref(), MetricKind::SweetFood)?;

    let entries = state.store.list().await?;
    let report = InsightReport::build_with_axes(&entries, state.today(), x, y);

    tracing::debug!(
        entries = report.entry_count,
        enough_data = report.has_enough_data,
        "Generated insight report"
    );

    Ok(Json(report))
}

fn parse_axis(raw: Option<&str>, default: MetricKind) -> ApiResult<MetricKind> {
    match raw {
        None => Ok(default),
        Some(s) => MetricKind::parse(s)
            .ok_or_else(|| ApiError::Validation(format!("Unknown metric '{}'", s))),
    }
}
