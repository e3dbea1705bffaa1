//! Correlation sampling
//!
//! Raw scatter points pairing two metrics of the same day. No binning and no
//! deduplication; samples keep the input order.

use crate::catalog::MetricKind;
use crate::storage::Entry;
use serde::Serialize;

/// Chart label format, e.g. "Oct 19"
pub const SAMPLE_LABEL_FORMAT: &str = "%b %d";

/// One scatter point
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CorrelationSample {
    pub x: u8,
    pub y: u8,
    /// Constant point weight
    pub z: u8,
    pub label: String,
}

/// One sample per entry with `x = metric_x`, `y = metric_y`
pub fn correlation_samples(
    entries: &[Entry],
    metric_x: MetricKind,
    metric_y: MetricKind,
) -> Vec<CorrelationSample> {
    entries
        .iter()
        .map(|e| CorrelationSample {
            x: e.value(metric_x),
            y: e.value(metric_y),
            z: 1,
            label: e.date.format(SAMPLE_LABEL_FORMAT).to_string(),
        })
        .collect()
}
