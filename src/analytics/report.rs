//! Insight and history reports
//!
//! Bundles the engine's outputs the way the HTTP layer serves them.

use crate::analytics::correlation::{correlation_samples, CorrelationSample};
use crate::analytics::insight::synthesize_insight;
use crate::analytics::summary::AggregateSummary;
use crate::analytics::weekday::{day_of_week_breakdown, DayOfWeekBreakdown};
use crate::analytics::window::{select_window, Window};
use crate::catalog::MetricKind;
use crate::storage::Entry;
use chrono::NaiveDate;
use serde::Serialize;

/// Entries needed before the charts are worth drawing
pub const MIN_ENTRIES_FOR_CHARTS: usize = 5;

/// Everything the insights page shows
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub window: Window,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub entry_count: usize,
    pub has_enough_data: bool,
    pub summary: Option<AggregateSummary>,
    pub day_of_week: [DayOfWeekBreakdown; 7],
    pub correlation_x: MetricKind,
    pub correlation_y: MetricKind,
    pub correlation: Vec<CorrelationSample>,
    pub insight: String,
}

impl InsightReport {
    /// Build the report over the recent window from the full entry set
    pub fn build(entries: &[Entry], today: NaiveDate) -> Self {
        Self::build_with_axes(entries, today, MetricKind::Activity, MetricKind::SweetFood)
    }

    /// Same as [`InsightReport::build`] with custom scatter axes
    pub fn build_with_axes(
        entries: &[Entry],
        today: NaiveDate,
        correlation_x: MetricKind,
        correlation_y: MetricKind,
    ) -> Self {
        let window = Window::Recent;
        let recent = select_window(entries, window, today);

        tracing::debug!(
            total = entries.len(),
            recent = recent.len(),
            "Building insight report"
        );

        Self {
            window,
            from: window.first_day(today),
            to: today,
            entry_count: recent.len(),
            has_enough_data: recent.len() >= MIN_ENTRIES_FOR_CHARTS,
            summary: AggregateSummary::from_entries(&recent),
            day_of_week: day_of_week_breakdown(&recent),
            correlation_x,
            correlation_y,
            correlation: correlation_samples(&recent, correlation_x, correlation_y),
            insight: synthesize_insight(&recent),
        }
    }
}
