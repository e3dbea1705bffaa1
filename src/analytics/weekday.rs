//! Day-of-week breakdown
//!
//! Buckets entries by calendar weekday (Sunday = 0 ... Saturday = 6) and
//! averages every metric per bucket. Empty buckets report 0 so charts always
//! get seven bars.

use crate::analytics::summary::{mean_level, round1};
use crate::catalog::MetricKind;
use crate::storage::Entry;
use chrono::Datelike;
use serde::Serialize;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Rounded per-metric means of one bucket
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct MetricMeans {
    pub mood: f64,
    pub activity: f64,
    pub sweet_food: f64,
    pub overeating: f64,
    pub sleep_recovery: f64,
}

impl MetricMeans {
    pub fn get(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::Mood => self.mood,
            MetricKind::Activity => self.activity,
            MetricKind::SweetFood => self.sweet_food,
            MetricKind::Overeating => self.overeating,
            MetricKind::SleepRecovery => self.sleep_recovery,
        }
    }

    fn set(&mut self, metric: MetricKind, value: f64) {
        match metric {
            MetricKind::Mood => self.mood = value,
            MetricKind::Activity => self.activity = value,
            MetricKind::SweetFood => self.sweet_food = value,
            MetricKind::Overeating => self.overeating = value,
            MetricKind::SleepRecovery => self.sleep_recovery = value,
        }
    }
}

/// Averages for one weekday
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayOfWeekBreakdown {
    /// 0 = Sunday
    pub index: u8,
    pub name: &'static str,
    pub count: usize,
    #[serde(flatten)]
    pub means: MetricMeans,
}

impl DayOfWeekBreakdown {
    pub fn has_entries(&self) -> bool {
        self.count > 0
    }
}

/// Seven records, Sunday first
pub fn day_of_week_breakdown(entries: &[Entry]) -> [DayOfWeekBreakdown; 7] {
    let mut buckets: [Vec<&Entry>; 7] = std::array::from_fn(|_| Vec::new());
    for entry in entries {
        let idx = entry.date.weekday().num_days_from_sunday() as usize;
        buckets[idx].push(entry);
    }

    std::array::from_fn(|idx| {
        let bucket = &buckets[idx];
        let mut means = MetricMeans::default();
        for &metric in MetricKind::all() {
            let mean = mean_level(bucket.iter().copied(), metric).map(round1);
            means.set(metric, mean.unwrap_or(0.0));
        }

        DayOfWeekBreakdown {
            index: idx as u8,
            name: WEEKDAY_NAMES[idx],
            count: bucket.len(),
            means,
        }
    })
}
