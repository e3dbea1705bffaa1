//! Window selection
//!
//! Picks the entries that fall inside a trailing calendar window ending today.
//! A window of span `s` keeps dates with `today - s < date <= today`, so
//! `Week` covers today and the six days before it.

use crate::storage::Entry;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trailing time window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// 7 days
    #[default]
    Week,
    /// 1 calendar month
    Month,
    /// 12 calendar months
    Year,
    /// 3 calendar months, used for insights
    Recent,
}

impl Window {
    /// Exclusive lower bound of the window
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            Window::Week => today.checked_sub_days(Days::new(7)),
            Window::Month => today.checked_sub_months(Months::new(1)),
            Window::Year => today.checked_sub_months(Months::new(12)),
            Window::Recent => today.checked_sub_months(Months::new(3)),
        };
        start.unwrap_or(NaiveDate::MIN)
    }

    /// First calendar day inside the window
    pub fn first_day(&self, today: NaiveDate) -> NaiveDate {
        self.start(today).succ_opt().unwrap_or(today)
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date > self.start(today) && date <= today
    }

    pub fn parse(s: &str) -> Option<Window> {
        match s.trim().to_lowercase().as_str() {
            "week" | "7d" => Some(Window::Week),
            "month" | "1m" => Some(Window::Month),
            "year" | "12m" | "1y" => Some(Window::Year),
            "recent" | "3m" => Some(Window::Recent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Week => write!(f, "week"),
            Window::Month => write!(f, "month"),
            Window::Year => write!(f, "year"),
            Window::Recent => write!(f, "recent"),
        }
    }
}

/// Entries inside `window`, ascending by date
pub fn select_window(entries: &[Entry], window: Window, today: NaiveDate) -> Vec<Entry> {
    let mut selected: Vec<Entry> = entries
        .iter()
        .filter(|e| window.contains(e.date, today))
        .cloned()
        .collect();
    selected.sort_by_key(|e| e.date);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{EntryDraft, Levels};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry_on(date: NaiveDate) -> Entry {
        Entry::from_draft(EntryDraft::new(date, Levels::default()).unwrap())
    }

    #[test]
    fn test_week_keeps_last_seven_days() {
        let today = ymd(2026, 10, 19);
        let entries: Vec<Entry> = (0..10)
            .map(|i| entry_on(today - Days::new(i)))
            .collect();

        let selected = select_window(&entries, Window::Week, today);
        assert_eq!(selected.len(), 7);
        assert_eq!(selected.first().map(|e| e.date), Some(ymd(2026, 10, 13)));
        assert_eq!(selected.last().map(|e| e.date), Some(today));
    }

    #[test]
    fn test_output_is_ascending() {
        let today = ymd(2026, 10, 19);
        let entries = vec![
            entry_on(ymd(2026, 10, 18)),
            entry_on(ymd(2026, 10, 15)),
            entry_on(ymd(2026, 10, 17)),
        ];

        let dates: Vec<NaiveDate> = select_window(&entries, Window::Week, today)
            .iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec![ymd(2026, 10, 15), ymd(2026, 10, 17), ymd(2026, 10, 18)]);
    }

    #[test]
    fn test_month_spans() {
        let today = ymd(2026, 3, 31);
        // February has no 31st; chrono clamps to the last day
        assert_eq!(Window::Month.start(today), ymd(2026, 2, 28));
        assert_eq!(Window::Recent.start(today), ymd(2025, 12, 31));
        assert_eq!(Window::Year.start(today), ymd(2025, 3, 31));
        assert_eq!(Window::Year.first_day(today), ymd(2025, 4, 1));
    }

    #[test]
    fn test_excludes_future_and_old() {
        let today = ymd(2026, 10, 19);
        let entries = vec![
            entry_on(ymd(2026, 10, 20)),
            entry_on(ymd(2026, 10, 12)),
            entry_on(ymd(2026, 10, 19)),
        ];

        let selected = select_window(&entries, Window::Week, today);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, today);
    }

    #[test]
    fn test_empty_input() {
        let today = ymd(2026, 10, 19);
        assert!(select_window(&[], Window::Year, today).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Window::parse("Month"), Some(Window::Month));
        assert_eq!(Window::parse("3m"), Some(Window::Recent));
        assert_eq!(Window::parse("decade"), None);
    }
}
