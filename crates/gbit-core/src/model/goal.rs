//! Goal, entry, and document types.
//!
//! These are the persisted shapes. Field names serialize in camelCase and
//! dates as `YYYY-MM-DD`, so a document written by any earlier gbit build
//! round-trips unchanged.
//!
//! `current_value` and `entries` are only mutable inside the crate: the
//! [`GoalStore`](crate::store::GoalStore) keeps
//! `current_value == sum(entries[*].value)` across every mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::aggregate;

/// A tracked yearly objective with an optional numeric target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `0` means "no numeric target".
    #[serde(default)]
    pub target_value: f64,
    #[serde(default)]
    pub(crate) current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub(crate) entries: Vec<GoalEntry>,
}

impl Goal {
    /// Running total of entry values.
    #[must_use]
    pub const fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Entries in logging order.
    #[must_use]
    pub fn entries(&self) -> &[GoalEntry] {
        &self.entries
    }

    /// Whether the goal carries a numeric target.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target_value > 0.0
    }

    /// Whether logging against this goal needs an explicit value.
    #[must_use]
    pub fn needs_value(&self) -> bool {
        self.has_target() || self.category.always_numeric()
    }

    /// Entries newest first, by creation timestamp.
    #[must_use]
    pub fn history(&self) -> Vec<&GoalEntry> {
        let mut entries: Vec<&GoalEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// `"12 / 30 chapters"`, with `∞` standing in for a missing target.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let target = if self.has_target() {
            format_number(self.target_value)
        } else {
            "∞".to_string()
        };
        let mut line = format!("{} / {target}", format_number(self.current_value));
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
            line.push(' ');
            line.push_str(unit);
        }
        line
    }
}

/// A single logged unit of progress against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEntry {
    pub id: String,
    /// Calendar date used for heatmap bucketing.
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: f64,
    /// Creation instant in milliseconds since the Unix epoch. Orders entries
    /// that share a date; never used for bucketing.
    #[serde(default)]
    pub timestamp: i64,
}

/// The top-level persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub goals: Vec<Goal>,
}

/// A goal whose stored current value disagreed with its entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub goal_id: String,
    pub title: String,
    pub stored: f64,
    pub computed: f64,
}

impl AppData {
    /// Goals whose stored `current_value` differs from the sum of their entries.
    #[must_use]
    pub fn drift(&self) -> Vec<Reconciliation> {
        self.goals
            .iter()
            .filter_map(|goal| {
                let computed = aggregate::sum_values(&goal.entries);
                (!values_match(goal.current_value, computed)).then(|| Reconciliation {
                    goal_id: goal.id.clone(),
                    title: goal.title.clone(),
                    stored: goal.current_value,
                    computed,
                })
            })
            .collect()
    }

    /// Recompute every goal's current value from its entries.
    ///
    /// Returns the goals whose stored value had drifted.
    pub fn reconcile(&mut self) -> Vec<Reconciliation> {
        let drift = self.drift();
        for goal in &mut self.goals {
            goal.current_value = aggregate::sum_values(&goal.entries);
        }
        drift
    }
}

/// Tolerant comparison for totals that may have been accumulated in a
/// different order by another writer.
fn values_match(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= scale * 1e-9
}

/// Render a value without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
