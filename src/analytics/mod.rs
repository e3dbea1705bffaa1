//! H-Tracker Aggregation Engine
//!
//! Pure functions over a slice of entries. Nothing here touches the store or
//! the clock; callers pass `today` explicitly.
//!
//! - **window**: trailing week / month / year / recent selection
//! - **summary**: per-metric averages rounded to one decimal
//! - **weekday**: Sunday-first day-of-week breakdown
//! - **correlation**: scatter samples for two metrics
//! - **insight**: threshold-based insight text
//! - **report**: the bundle served by the insights endpoint
//!
//! ```text
//! list() ──► select_window(Recent) ──┬─► AggregateSummary
//!                                    ├─► day_of_week_breakdown ─┐
//!                                    ├─► correlation_samples    │
//!                                    └─► synthesize_insight ◄───┘
//! ```

pub mod correlation;
pub mod insight;
pub mod report;
pub mod summary;
pub mod weekday;
pub mod window;

pub use correlation::{correlation_samples, CorrelationSample};
pub use insight::{synthesize_insight, LOW_DATA_MESSAGE};
pub use report::{InsightReport, MIN_ENTRIES_FOR_CHARTS};
pub use summary::{average, round1, AggregateSummary, MetricAverage};
pub use weekday::{day_of_week_breakdown, DayOfWeekBreakdown, MetricMeans};
pub use window::{select_window, Window};
