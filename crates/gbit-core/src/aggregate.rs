//! Entry aggregation: running totals and per-day activity counts.
//!
//! Day keys are built from the entry's calendar fields (`YYYY-MM-DD`), never
//! from an instant converted to UTC. An entry dated `2026-03-15` always lands
//! in the `2026-03-15` bucket, whatever the process timezone.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{Goal, GoalEntry};

/// Day key → number of entries logged on that day.
pub type DayCounts = BTreeMap<String, u32>;

/// Zero-padded `YEAR-MONTH-DAY` key from calendar fields.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Count entries per day. Each entry contributes exactly one, whatever its value.
#[must_use]
pub fn counts_by_day<'a, I>(entries: I) -> DayCounts
where
    I: IntoIterator<Item = &'a GoalEntry>,
{
    let mut counts = DayCounts::new();
    for entry in entries {
        *counts.entry(date_key(entry.date)).or_insert(0) += 1;
    }
    counts
}

/// Day counts across every goal, for the global heatmap.
#[must_use]
pub fn counts_by_day_for_goals(goals: &[Goal]) -> DayCounts {
    let counts = counts_by_day(goals.iter().flat_map(Goal::entries));
    tracing::debug!(days = counts.len(), goals = goals.len(), "aggregated day counts");
    counts
}

/// Count stored for `date`, or zero.
#[must_use]
pub fn count_on(counts: &DayCounts, date: NaiveDate) -> u32 {
    counts.get(&date_key(date)).copied().unwrap_or(0)
}

/// Plain total of entry values, folded in entry order.
#[must_use]
pub fn sum_values(entries: &[GoalEntry]) -> f64 {
    entries.iter().fold(0.0, |total, entry| total + entry.value)
}

/// Heatmap cell intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Every tier, lightest first (legend order).
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// 0 → none, 1 → low, 2 → medium, 3+ → high.
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Hover text for a heatmap cell: `"3 logs on Mar 15"`.
#[must_use]
pub fn cell_tooltip(date: NaiveDate, count: u32) -> String {
    format!("{count} logs on {}", date.format("%b %-d"))
}
