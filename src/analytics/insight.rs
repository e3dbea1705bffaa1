//! Insight synthesis
//!
//! Turns the recent window into a few plain sentences:
//!
//! 1. Overall mood average
//! 2. Best and worst weekday for mood
//! 3. Mood on active vs inactive days
//! 4. Mood on low vs high sweet-food days
//!
//! Comparisons only produce a sentence when both sides have entries and the
//! mood difference is larger than [`COMPARISON_THRESHOLD`].
//!
//! Weekday ties go to the first weekday in Sunday-first order, for both the
//! best and the worst day. A weekday whose mean mood is 0.0 gets no sentence.

use crate::analytics::summary::{average, fmt1, mean_level};
use crate::analytics::weekday::{day_of_week_breakdown, DayOfWeekBreakdown};
use crate::catalog::MetricKind;
use crate::storage::Entry;

/// Returned when the window is too small to say anything
pub const LOW_DATA_MESSAGE: &str =
    "Not enough data to generate meaningful insights. Continue tracking for at least a week.";

/// Minimum entries before any insight is computed
pub(crate) const MIN_ENTRIES_FOR_INSIGHTS: usize = 7;

/// Mood points a comparison must exceed
pub const COMPARISON_THRESHOLD: f64 = 1.0;

/// Activity level from which a day counts as active
pub const ACTIVE_MIN_LEVEL: u8 = 3;

/// Highest sweet-food level that still counts as low
pub const LOW_SWEET_MAX_LEVEL: u8 = 2;

/// Build the insight text for an already window-filtered slice
pub fn synthesize_insight(entries: &[Entry]) -> String {
    if entries.len() < MIN_ENTRIES_FOR_INSIGHTS {
        return LOW_DATA_MESSAGE.to_string();
    }

    let mut sentences = Vec::new();

    if let Some(avg) = average(entries, MetricKind::Mood) {
        sentences.push(format!(
            "Your average mood is {} out of {}.",
            fmt1(avg),
            MetricKind::Mood.max_value()
        ));
    }

    let breakdown = day_of_week_breakdown(entries);
    let best = best_day(&breakdown);
    let worst = worst_day(&breakdown);

    if let Some(best) = best.filter(|b| b.means.mood > 0.0) {
        sentences.push(format!(
            "Your mood tends to be best on {}s ({}).",
            best.name,
            fmt1(best.means.mood)
        ));
    }

    if let Some(worst) = worst.filter(|w| w.means.mood > 0.0) {
        if best.map(|b| b.index) != Some(worst.index) {
            sentences.push(format!(
                "Your mood tends to be lowest on {}s ({}).",
                worst.name,
                fmt1(worst.means.mood)
            ));
        }
    }

    let activity_diff = mood_difference(entries, |e| {
        e.value(MetricKind::Activity) >= ACTIVE_MIN_LEVEL
    });
    if let Some(diff) = activity_diff {
        if diff > COMPARISON_THRESHOLD {
            sentences.push(format!(
                "You tend to feel better on days with more physical activity (+{} mood points).",
                fmt1(diff)
            ));
        } else if diff < -COMPARISON_THRESHOLD {
            sentences.push(format!(
                "Interestingly, you tend to feel better on days with less physical activity ({} mood points higher).",
                fmt1(diff.abs())
            ));
        }
    }

    let sweet_diff = mood_difference(entries, |e| {
        e.value(MetricKind::SweetFood) <= LOW_SWEET_MAX_LEVEL
    });
    if let Some(diff) = sweet_diff {
        if diff > COMPARISON_THRESHOLD {
            sentences.push(format!(
                "You tend to feel better on days with less sweet food consumption (+{} mood points).",
                fmt1(diff)
            ));
        } else if diff < -COMPARISON_THRESHOLD {
            sentences.push(format!(
                "You tend to feel better on days with more sweet food consumption (+{} mood points).",
                fmt1(diff.abs())
            ));
        }
    }

    sentences.join(" ")
}

/// Weekday with the highest mean mood among weekdays that have entries
pub fn best_day(breakdown: &[DayOfWeekBreakdown]) -> Option<&DayOfWeekBreakdown> {
    breakdown
        .iter()
        .filter(|d| d.has_entries())
        .fold(None, |best: Option<&DayOfWeekBreakdown>, day| match best {
            Some(b) if b.means.mood >= day.means.mood => Some(b),
            _ => Some(day),
        })
}

/// Weekday with the lowest mean mood among weekdays that have entries
pub fn worst_day(breakdown: &[DayOfWeekBreakdown]) -> Option<&DayOfWeekBreakdown> {
    breakdown
        .iter()
        .filter(|d| d.has_entries())
        .fold(None, |worst: Option<&DayOfWeekBreakdown>, day| match worst {
            Some(w) if w.means.mood <= day.means.mood => Some(w),
            _ => Some(day),
        })
}

/// Mean mood of matching entries minus mean mood of the rest.
/// `None` when either side is empty.
fn mood_difference<F>(entries: &[Entry], matches: F) -> Option<f64>
where
    F: Fn(&Entry) -> bool,
{
    let (yes, no): (Vec<&Entry>, Vec<&Entry>) = entries.iter().partition(|e| matches(e));

    let yes_mean = mean_level(yes.iter().copied(), MetricKind::Mood)?;
    let no_mean = mean_level(no.iter().copied(), MetricKind::Mood)?;
    Some(yes_mean - no_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{EntryDraft, Levels};
    use chrono::{Days, NaiveDate};

    /// 2026-10-18 is a Sunday
    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn day(offset: u64, mood: u8, activity: u8, sweet: u8) -> Entry {
        let levels = Levels::default()
            .with(MetricKind::Mood, mood)
            .with(MetricKind::Activity, activity)
            .with(MetricKind::SweetFood, sweet);
        Entry::from_draft(EntryDraft::new(sunday() + Days::new(offset), levels).unwrap())
    }

    /// Sun..Sat moods 2,4,6,8,6,4,2; active on Tuesday (6) and Wednesday (8)
    fn week_scenario() -> Vec<Entry> {
        let moods = [2, 4, 6, 8, 6, 4, 2];
        moods
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let activity = if i == 2 || i == 3 { 4 } else { 1 };
                day(i as u64, m, activity, 1)
            })
            .collect()
    }

    #[test]
    fn test_low_data_message() {
        let entries: Vec<Entry> = (0..6).map(|i| day(i, 8, 5, 0)).collect();
        assert_eq!(synthesize_insight(&entries), LOW_DATA_MESSAGE);
        assert_eq!(synthesize_insight(&[]), LOW_DATA_MESSAGE);
    }

    #[test]
    fn test_week_scenario() {
        let text = synthesize_insight(&week_scenario());

        assert_eq!(
            text,
            "Your average mood is 4.6 out of 8. \
             Your mood tends to be best on Wednesdays (8.0). \
             Your mood tends to be lowest on Sundays (2.0). \
             You tend to feel better on days with more physical activity (+3.4 mood points)."
        );
    }

    #[test]
    fn test_no_sweet_sentence_without_high_days() {
        let text = synthesize_insight(&week_scenario());
        assert!(!text.contains("sweet food"));
    }

    #[test]
    fn test_sweet_food_both_directions() {
        // Low-sweet days feel better
        let mut entries: Vec<Entry> = (0..4).map(|i| day(i, 7, 1, 0)).collect();
        entries.extend((4..8).map(|i| day(i, 3, 1, 5)));
        let text = synthesize_insight(&entries);
        assert!(text.contains(
            "You tend to feel better on days with less sweet food consumption (+4.0 mood points)."
        ));

        // High-sweet days feel better
        let mut entries: Vec<Entry> = (0..4).map(|i| day(i, 2, 1, 1)).collect();
        entries.extend((4..8).map(|i| day(i, 5, 1, 3)));
        let text = synthesize_insight(&entries);
        assert!(text.contains(
            "You tend to feel better on days with more sweet food consumption (+3.0 mood points)."
        ));
    }

    #[test]
    fn test_inactive_days_feel_better() {
        let mut entries: Vec<Entry> = (0..4).map(|i| day(i, 7, 0, 0)).collect();
        entries.extend((4..7).map(|i| day(i, 2, 5, 0)));
        let text = synthesize_insight(&entries);
        assert!(text.contains(
            "Interestingly, you tend to feel better on days with less physical activity (5.0 mood points higher)."
        ));
    }

    #[test]
    fn test_difference_at_threshold_is_silent() {
        // active mean 5, inactive mean 4: exactly 1 point
        let mut entries: Vec<Entry> = (0..4).map(|i| day(i, 4, 0, 0)).collect();
        entries.extend((4..7).map(|i| day(i, 5, 3, 0)));
        let text = synthesize_insight(&entries);
        assert!(!text.contains("physical activity"));
    }

    #[test]
    fn test_all_active_has_no_activity_sentence() {
        let entries: Vec<Entry> = (0..7).map(|i| day(i, (i % 9) as u8, 4, 0)).collect();
        let text = synthesize_insight(&entries);
        assert!(!text.contains("physical activity"));
    }

    #[test]
    fn test_single_weekday_has_no_worst_sentence() {
        // Seven Sundays
        let entries: Vec<Entry> = (0..7).map(|w| day(w * 7, 5, 1, 1)).collect();
        let text = synthesize_insight(&entries);

        assert!(text.contains("Your mood tends to be best on Sundays (5.0)."));
        assert!(!text.contains("lowest"));
    }

    #[test]
    fn test_ties_go_to_first_weekday() {
        let entries: Vec<Entry> = (0..7).map(|i| day(i, 4, 1, 1)).collect();
        let breakdown = day_of_week_breakdown(&entries);

        assert_eq!(best_day(&breakdown).map(|d| d.name), Some("Sunday"));
        assert_eq!(worst_day(&breakdown).map(|d| d.name), Some("Sunday"));

        let text = synthesize_insight(&entries);
        assert!(text.contains("best on Sundays"));
        assert!(!text.contains("lowest"));
    }

    #[test]
    fn test_empty_weekdays_are_not_worst() {
        // Only Monday..Wednesday have entries
        let entries: Vec<Entry> = [1, 2, 3, 8, 9, 10, 15]
            .iter()
            .map(|&o| day(o, if o % 7 == 1 { 6 } else { 3 }, 1, 1))
            .collect();
        let breakdown = day_of_week_breakdown(&entries);

        assert_eq!(best_day(&breakdown).map(|d| d.name), Some("Monday"));
        assert_eq!(worst_day(&breakdown).map(|d| d.name), Some("Tuesday"));
    }

    #[test]
    fn test_zero_mood_week_has_no_weekday_sentences() {
        let entries: Vec<Entry> = (0..7).map(|i| day(i, 0, 1, 1)).collect();
        assert_eq!(synthesize_insight(&entries), "Your average mood is 0.0 out of 8.");
    }

    #[test]
    fn test_zero_mean_worst_day_is_skipped() {
        // Sunday at 0, Monday..Saturday at 6
        let entries: Vec<Entry> = (0..7)
            .map(|i| day(i, if i == 0 { 0 } else { 6 }, 1, 1))
            .collect();
        let text = synthesize_insight(&entries);

        assert!(text.contains("Your mood tends to be best on Mondays (6.0)."));
        assert!(!text.contains("lowest"));
    }

    #[test]
    fn test_order_independent() {
        let mut entries = week_scenario();
        let forward = synthesize_insight(&entries);
        entries.reverse();
        assert_eq!(forward, synthesize_insight(&entries));
    }
}
