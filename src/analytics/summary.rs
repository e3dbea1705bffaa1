//! Averaging
//!
//! Per-metric arithmetic means, rounded to one decimal. Every metric is
//! averaged on its own pass over the entries.

use crate::catalog::MetricKind;
use crate::storage::Entry;
use serde::Serialize;

/// Round to one decimal, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format with one decimal after `round1`
pub(crate) fn fmt1(value: f64) -> String {
    format!("{:.1}", round1(value))
}

/// Unrounded mean of one metric, `None` when there are no entries
pub fn mean_level<'a, I>(entries: I, metric: MetricKind) -> Option<f64>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let (sum, count) = entries
        .into_iter()
        .fold((0u64, 0usize), |(sum, count), e| {
            (sum + u64::from(e.value(metric)), count + 1)
        });

    if count == 0 {
        return None;
    }
    Some(sum as f64 / count as f64)
}

/// Mean of one metric rounded to one decimal
pub fn average(entries: &[Entry], metric: MetricKind) -> Option<f64> {
    mean_level(entries, metric).map(round1)
}

/// Average of a single metric
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricAverage {
    pub metric: MetricKind,
    pub name: &'static str,
    pub value: f64,
}

/// Per-metric averages over a window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateSummary {
    pub entry_count: usize,
    pub averages: Vec<MetricAverage>,
}

impl AggregateSummary {
    /// `None` for an empty window
    pub fn from_entries(entries: &[Entry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let averages = MetricKind::all()
            .iter()
            .filter_map(|&metric| {
                average(entries, metric).map(|value| MetricAverage {
                    metric,
                    name: metric.display_name(),
                    value,
                })
            })
            .collect();

        Some(Self {
            entry_count: entries.len(),
            averages,
        })
    }

    pub fn get(&self, metric: MetricKind) -> Option<f64> {
        self.averages
            .iter()
            .find(|a| a.metric == metric)
            .map(|a| a.value)
    }
}
