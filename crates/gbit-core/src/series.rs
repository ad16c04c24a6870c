//! Cumulative progress series for per-goal charts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::GoalEntry;

/// Label of the synthetic zero point at the start of the year.
pub const START_LABEL: &str = "Start";

/// One chart point: running total after an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// `"Start"` for the seed point, otherwise short month and day (`"Feb 1"`).
    pub label: String,
    pub date: NaiveDate,
    pub total: f64,
}

/// Running totals in logging order, seeded with a zero point at `year_start`.
///
/// Entries are ordered by creation timestamp, not by date, so same-day
/// entries keep the order they were logged in. The seed point is skipped only
/// when the first ordered entry is dated exactly `year_start`.
#[must_use]
pub fn cumulative_series(entries: &[GoalEntry], year_start: NaiveDate) -> Vec<SeriesPoint> {
    let mut ordered: Vec<&GoalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut points = Vec::with_capacity(ordered.len() + 1);
    if ordered.first().is_none_or(|first| first.date != year_start) {
        points.push(SeriesPoint {
            label: START_LABEL.to_string(),
            date: year_start,
            total: 0.0,
        });
    }

    let mut total = 0.0;
    for entry in ordered {
        total += entry.value;
        points.push(SeriesPoint {
            label: entry.date.format("%b %-d").to_string(),
            date: entry.date,
            total,
        });
    }
    points
}
