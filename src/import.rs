//! CSV Import
//!
//! Reads daily entries from CSV files, e.g. a previous export or a
//! spreadsheet kept before tracking moved here.
//!
//! Expected columns (any order, extra columns ignored):
//! `date,mood,activity,sweet_food,overeating,sleep_recovery`.
//! Header names are case-insensitive; `sweetFood` and `sleepRecovery` work too.

use crate::catalog::MetricKind;
use crate::storage::{EntryDraft, Levels};
use chrono::{DateTime, NaiveDate};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that abort the whole import
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),
}

/// CSV entry importer
pub struct CsvImporter {
    /// Format string for the date column
    date_format: String,
    /// Header of the date column
    date_column: String,
    /// Cap on collected row errors
    max_errors: usize,
}

/// Result of a CSV import operation
#[derive(Debug)]
pub struct CsvImportResult {
    /// Valid rows in file order
    pub drafts: Vec<EntryDraft>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvImporter {
    /// Create a new CSV importer with default settings
    pub fn new() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            date_column: "date".to_string(),
            max_errors: 100,
        }
    }

    /// Set the date format string
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    /// Set the header of the date column
    pub fn with_date_column(mut self, column: &str) -> Self {
        self.date_column = column.to_string();
        self
    }

    /// Import entries from a CSV file
    pub fn import(&self, path: &Path) -> Result<CsvImportResult, ImportError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        self.import_reader(file)
    }

    /// Import from a CSV string
    pub fn import_str(&self, csv_data: &str) -> Result<CsvImportResult, ImportError> {
        self.import_reader(csv_data.as_bytes())
    }

    pub fn import_reader<R: Read>(&self, source: R) -> Result<CsvImportResult, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let columns = self.locate_columns(reader.headers()?)?;

        let mut drafts = Vec::new();
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            // Header is line 1
            let actual_line = line_num + 2;

            let parsed = result
                .map_err(|e| e.to_string())
                .and_then(|record| self.parse_record(&record, &columns));

            match parsed {
                Ok(draft) => drafts.push(draft),
                Err(e) => {
                    rows_failed += 1;
                    errors.push(format!("Line {}: {}", actual_line, e));
                }
            }
        }

        // Truncate errors if too many
        if errors.len() > self.max_errors {
            let total = errors.len();
            errors.truncate(self.max_errors);
            errors.push(format!("... and {} more errors", total - self.max_errors));
        }

        tracing::debug!(
            rows = drafts.len(),
            failed = rows_failed,
            "CSV import parsed"
        );

        Ok(CsvImportResult {
            rows_processed: drafts.len(),
            drafts,
            rows_failed,
            errors,
        })
    }

    /// Column index of the date and of each metric
    fn locate_columns(&self, headers: &csv::StringRecord) -> Result<Columns, ImportError> {
        let date = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(&self.date_column))
            .ok_or_else(|| ImportError::MissingColumn(self.date_column.clone()))?;

        let mut metrics = Vec::with_capacity(MetricKind::all().len());
        for &metric in MetricKind::all() {
            let idx = headers
                .iter()
                .position(|h| MetricKind::parse(h) == Some(metric))
                .ok_or_else(|| ImportError::MissingColumn(metric.key().to_string()))?;
            metrics.push((metric, idx));
        }

        Ok(Columns { date, metrics })
    }

    fn parse_record(&self, record: &csv::StringRecord, columns: &Columns) -> Result<EntryDraft, String> {
        let raw_date = record
            .get(columns.date)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "missing date".to_string())?;
        let date = self.parse_date(raw_date)?;

        let mut levels = Levels::default();
        for &(metric, idx) in &columns.metrics {
            let raw = record
                .get(idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("missing {}", metric))?;
            let value: i64 = raw
                .parse()
                .map_err(|_| format!("{} value '{}' is not a whole number", metric, raw))?;
            let level = metric.check(value).map_err(|e| e.to_string())?;
            levels.set(metric, level);
        }

        EntryDraft::new(date, levels).map_err(|e| e.to_string())
    }

    /// Configured format first, then ISO dates and RFC 3339 timestamps
    fn parse_date(&self, raw: &str) -> Result<NaiveDate, String> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, &self.date_format) {
            return Ok(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.date_naive());
        }

        Err(format!("Could not parse date: {}", raw))
    }
}

struct Columns {
    date: usize,
    metrics: Vec<(MetricKind, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv_import() {
        let csv_data = "date,mood,activity,sweet_food,overeating,sleep_recovery
2026-10-15,6,3,1,0,5
2026-10-16,4,1,4,2,3
2026-10-17,8,5,0,0,6";

        let result = CsvImporter::new().import_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 3);
        assert_eq!(result.rows_failed, 0);
        assert_eq!(result.drafts[1].levels.sweet_food, 4);
        assert_eq!(
            result.drafts[2].date,
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_camel_case_headers_and_extra_columns() {
        let csv_data = "id,Date,Mood,Activity,sweetFood,Overeating,sleepRecovery,note
x,2026-10-15,6,3,1,0,5,fine";

        let result = CsvImporter::new().import_str(csv_data).unwrap();
        assert_eq!(result.rows_processed, 1);
        assert_eq!(result.drafts[0].levels.sleep_recovery, 5);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let csv_data = "date,mood,activity,sweet_food,overeating,sleep_recovery
2026-10-15,9,3,1,0,5
yesterday,6,3,1,0,5
2026-10-17,6,,1,0,5
2026-10-18,6,3,1,0,5";

        let result = CsvImporter::new().import_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 1);
        assert_eq!(result.rows_failed, 3);
        assert!(result.errors[0].starts_with("Line 2:"));
        assert!(result.errors[0].contains("out of range"));
        assert!(result.errors[1].contains("Could not parse date"));
        assert!(result.errors[2].contains("missing activity"));
    }

    #[test]
    fn test_missing_column_fails_import() {
        let csv_data = "date,mood,activity\n2026-10-15,6,3";
        let err = CsvImporter::new().import_str(csv_data).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(c) if c == "sweet_food"));
    }

    #[test]
    fn test_custom_date_format() {
        let csv_data = "day,mood,activity,sweet_food,overeating,sleep_recovery
15/10/2026,6,3,1,0,5";

        let result = CsvImporter::new()
            .with_date_column("day")
            .with_date_format("%d/%m/%Y")
            .import_str(csv_data)
            .unwrap();

        assert_eq!(
            result.drafts[0].date,
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
    }

    #[test]
    fn test_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.csv");
        std::fs::write(
            &path,
            "date,mood,activity,sweet_food,overeating,sleep_recovery\n2026-10-15,6,3,1,0,5\n",
        )
        .unwrap();

        let result = CsvImporter::new().import(&path).unwrap();
        assert_eq!(result.rows_processed, 1);
    }
}
