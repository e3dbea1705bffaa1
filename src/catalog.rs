//! Metric Catalog
//!
//! Static option lists for every tracked metric. Each metric is an ordinal
//! scale starting at 0; the catalog owns the bounds and the human-readable
//! label of every level.
//!
//! Entries only store the numeric level. Labels are looked up here whenever
//! an entry is rendered, so renaming a label never leaves stale copies behind.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single selectable level of a metric
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricOption {
    pub value: u8,
    pub label: &'static str,
}

const fn opt(value: u8, label: &'static str) -> MetricOption {
    MetricOption { value, label }
}

const MOOD_LEVELS: [MetricOption; 9] = [
    opt(0, "totally awful"),
    opt(1, "very bad"),
    opt(2, "bad"),
    opt(3, "not cool"),
    opt(4, "okay"),
    opt(5, "nice"),
    opt(6, "good"),
    opt(7, "great"),
    opt(8, "superb"),
];

const ACTIVITY_LEVELS: [MetricOption; 6] = [
    opt(0, "none"),
    opt(1, "a bit"),
    opt(2, "mild"),
    opt(3, "good"),
    opt(4, "intense"),
    opt(5, "extreme"),
];

const SWEET_FOOD_LEVELS: [MetricOption; 7] = [
    opt(0, "none"),
    opt(1, "a tiny bit"),
    opt(2, "small amount"),
    opt(3, "medium amount"),
    opt(4, "big chunk"),
    opt(5, "a lot"),
    opt(6, "over the top"),
];

const OVEREATING_LEVELS: [MetricOption; 6] = [
    opt(0, "not at all"),
    opt(1, "slightly"),
    opt(2, "moderately"),
    opt(3, "noticeably"),
    opt(4, "heavily"),
    opt(5, "extremely"),
];

const SLEEP_RECOVERY_LEVELS: [MetricOption; 7] = [
    opt(0, "exhausted"),
    opt(1, "very poor"),
    opt(2, "poor"),
    opt(3, "fair"),
    opt(4, "decent"),
    opt(5, "good"),
    opt(6, "fully rested"),
];

/// The metrics recorded once per day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Self-feeling, the primary wellbeing metric
    Mood,
    Activity,
    SweetFood,
    Overeating,
    SleepRecovery,
}

impl MetricKind {
    /// All metrics in display order
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::Mood,
            MetricKind::Activity,
            MetricKind::SweetFood,
            MetricKind::Overeating,
            MetricKind::SleepRecovery,
        ]
    }

    /// JSON / CSV field name
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Mood => "mood",
            MetricKind::Activity => "activity",
            MetricKind::SweetFood => "sweet_food",
            MetricKind::Overeating => "overeating",
            MetricKind::SleepRecovery => "sleep_recovery",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Mood => "Self-feeling",
            MetricKind::Activity => "Activity",
            MetricKind::SweetFood => "Sweet Food",
            MetricKind::Overeating => "Overeating",
            MetricKind::SleepRecovery => "Sleep Recovery",
        }
    }

    /// Ordered option list for this metric
    pub fn options(&self) -> &'static [MetricOption] {
        match self {
            MetricKind::Mood => &MOOD_LEVELS,
            MetricKind::Activity => &ACTIVITY_LEVELS,
            MetricKind::SweetFood => &SWEET_FOOD_LEVELS,
            MetricKind::Overeating => &OVEREATING_LEVELS,
            MetricKind::SleepRecovery => &SLEEP_RECOVERY_LEVELS,
        }
    }

    /// Highest valid level (lowest is always 0)
    pub fn max_value(&self) -> u8 {
        self.options().last().map(|o| o.value).unwrap_or(0)
    }

    /// Label of a level, `None` when out of range
    pub fn label(&self, value: u8) -> Option<&'static str> {
        self.options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label)
    }

    /// Validate a raw level coming from a request or a CSV row
    pub fn check(&self, value: i64) -> Result<u8, LevelError> {
        if value < 0 || value > i64::from(self.max_value()) {
            return Err(LevelError {
                metric: *self,
                value,
            });
        }
        Ok(value as u8)
    }

    /// Parse a metric name, accepting the legacy camelCase spellings
    pub fn parse(name: &str) -> Option<MetricKind> {
        match name.trim().to_lowercase().as_str() {
            "mood" | "self_feeling" | "selffeeling" => Some(MetricKind::Mood),
            "activity" => Some(MetricKind::Activity),
            "sweet_food" | "sweetfood" => Some(MetricKind::SweetFood),
            "overeating" => Some(MetricKind::Overeating),
            "sleep_recovery" | "sleeprecovery" => Some(MetricKind::SleepRecovery),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A level outside the metric's declared bounds
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{metric} level {value} is out of range (0-{max})", max = .metric.max_value())]
pub struct LevelError {
    pub metric: MetricKind,
    pub value: i64,
}

/// Catalog entry for one metric, as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct MetricCatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub max_value: u8,
    pub options: &'static [MetricOption],
}

/// The whole catalog in display order
pub fn catalog() -> Vec<MetricCatalogEntry> {
    MetricKind::all()
        .iter()
        .map(|m| MetricCatalogEntry {
            key: m.key(),
            name: m.display_name(),
            max_value: m.max_value(),
            options: m.options(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(MetricKind::Mood.max_value(), 8);
        assert_eq!(MetricKind::Activity.max_value(), 5);
        assert_eq!(MetricKind::SweetFood.max_value(), 6);
        assert_eq!(MetricKind::Overeating.max_value(), 5);
        assert_eq!(MetricKind::SleepRecovery.max_value(), 6);
    }

    #[test]
    fn test_options_are_dense_from_zero() {
        for metric in MetricKind::all() {
            for (i, option) in metric.options().iter().enumerate() {
                assert_eq!(option.value as usize, i, "{} option {}", metric, i);
            }
        }
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(MetricKind::Mood.label(4), Some("okay"));
        assert_eq!(MetricKind::SweetFood.label(6), Some("over the top"));
        assert_eq!(MetricKind::Activity.label(6), None);
    }

    #[test]
    fn test_check() {
        assert_eq!(MetricKind::Mood.check(8), Ok(8));
        assert!(MetricKind::Mood.check(9).is_err());
        assert!(MetricKind::Activity.check(-1).is_err());

        let err = MetricKind::SleepRecovery.check(7).unwrap_err();
        assert_eq!(err.to_string(), "sleep_recovery level 7 is out of range (0-6)");
    }

    #[test]
    fn test_parse() {
        assert_eq!(MetricKind::parse("sweetFood"), Some(MetricKind::SweetFood));
        assert_eq!(MetricKind::parse("SLEEP_RECOVERY"), Some(MetricKind::SleepRecovery));
        assert_eq!(MetricKind::parse("steps"), None);
    }

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_string(&catalog()).unwrap();
        assert!(json.contains("\"key\":\"sweet_food\""));
        assert!(json.contains("\"label\":\"superb\""));
    }
}
