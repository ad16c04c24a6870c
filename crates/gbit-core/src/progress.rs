//! Completion percentages and dashboard chart summaries.

use serde::Serialize;

use crate::model::{Category, Goal};

/// Percent bonus per entry for goals tracked by activity rather than target.
const ACTIVITY_PERCENT_PER_ENTRY: f64 = 10.0;

/// Completion percentage, capped at 100 for display.
///
/// Returns 0 when there is no target. The stored current value is never
/// capped; only this derived figure is.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(current_value: f64, target_value: f64) -> u8 {
    if target_value <= 0.0 || target_value.is_nan() {
        return 0;
    }
    let ratio = (current_value / target_value * 100.0).min(100.0);
    if ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    // Clamped into 0..=100 above.
    ratio.round() as u8
}

/// Percent complete for a goal.
#[must_use]
pub fn goal_percent(goal: &Goal) -> u8 {
    progress_percent(goal.current_value(), goal.target_value)
}

/// Coarse completion state of a single goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    /// No numeric target; tracked by entry count.
    NoTarget,
    InProgress,
    Completed,
}

impl CompletionState {
    #[must_use]
    pub fn of(goal: &Goal) -> Self {
        if !goal.has_target() {
            Self::NoTarget
        } else if goal.current_value() >= goal.target_value {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTarget => "no target",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

/// Average progress of one category's goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub category: Category,
    pub progress: u8,
    pub goals: usize,
    pub color: &'static str,
}

/// Per-category average progress, in [`Category::ALL`] order.
///
/// Goals without a target contribute 10% per logged entry (capped at 100).
/// Categories with no goals are omitted.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn category_breakdown(goals: &[Goal]) -> Vec<CategoryProgress> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<&Goal> = goals.iter().filter(|g| g.category == category).collect();
            if members.is_empty() {
                return None;
            }
            let total: f64 = members.iter().map(|g| raw_progress(g)).sum();
            let mean = (total / members.len() as f64).round().clamp(0.0, 100.0);
            Some(CategoryProgress {
                category,
                progress: mean as u8,
                goals: members.len(),
                color: category.color().hex,
            })
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn raw_progress(goal: &Goal) -> f64 {
    if goal.has_target() {
        (goal.current_value() / goal.target_value * 100.0).min(100.0)
    } else {
        (goal.entries().len() as f64 * ACTIVITY_PERCENT_PER_ENTRY).min(100.0)
    }
}

/// Completed vs. everything else, for the status chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub completed: usize,
    pub in_progress: usize,
}

impl StatusSummary {
    #[must_use]
    pub const fn total(self) -> usize {
        self.completed + self.in_progress
    }
}

/// Count completed goals; goals without a target count as in progress.
#[must_use]
pub fn status_summary(goals: &[Goal]) -> StatusSummary {
    let completed = goals
        .iter()
        .filter(|g| CompletionState::of(g) == CompletionState::Completed)
        .count();
    StatusSummary {
        completed,
        in_progress: goals.len() - completed,
    }
}
