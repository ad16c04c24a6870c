//! `gbit list`: every goal with its completion percentage.

use clap::Args;
use gbit_core::Goal;
use gbit_core::progress::{CompletionState, goal_percent};
use serde::Serialize;
use std::io::{self, Write};

use super::Context;
use crate::output::{Renderable, progress_bar, render_list};

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

/// One row of `gbit list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRow {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Rounded and capped at 100; 0 when the goal has no target.
    pub percent: u8,
    pub state: CompletionState,
    pub current_value: f64,
    pub target_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub entries: usize,
    pub summary: String,
}

impl GoalRow {
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            category: goal.category.to_string(),
            percent: goal_percent(goal),
            state: CompletionState::of(goal),
            current_value: goal.current_value(),
            target_value: goal.target_value,
            unit: goal.unit.clone(),
            entries: goal.entries().len(),
            summary: goal.summary_line(),
        }
    }

    fn percent_label(&self) -> String {
        if self.state == CompletionState::NoTarget {
            "-".to_string()
        } else {
            format!("{}%", self.percent)
        }
    }
}

impl Renderable for GoalRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let short_id: String = self.id.chars().take(8).collect();
        writeln!(
            w,
            "{short_id}  {:<8}  {} {:>4}  {:<24}  {}",
            self.category,
            progress_bar(self.percent, 10),
            self.percent_label(),
            self.summary,
            self.title
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            self.id,
            self.category,
            self.percent_label(),
            self.summary,
            self.title
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "CATEGORY", "PERCENT", "PROGRESS", "TITLE"]
    }
}

pub fn run_list(_args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.load_store();
    let rows: Vec<GoalRow> = store.goals().iter().map(GoalRow::from_goal).collect();

    if rows.is_empty() && ctx.output.is_pretty() {
        println!("No goals yet. Create one with `gbit new --title <TITLE>`.");
        return Ok(());
    }
    render_list(&rows, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gbit_core::{Category, GoalStore, NewGoal};

    #[test]
    fn row_reflects_goal_progress() {
        let mut store = GoalStore::default();
        let id = store
            .create_goal(NewGoal::new("Rust book", Category::Book).target(20.0))
            .id
            .clone();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).expect("date");
        store.add_entry(&id, day, 5.0, "").expect("add");

        let row = GoalRow::from_goal(store.goal(&id).expect("goal"));
        assert_eq!(row.percent, 25);
        assert_eq!(row.state, CompletionState::InProgress);
        assert_eq!(row.summary, "5 / 20 chapters");

        let mut buf = Vec::new();
        row.render_table(&mut buf).expect("render");
        let line = String::from_utf8(buf).expect("utf8");
        assert_eq!(line, format!("{id}\tBook\t25%\t5 / 20 chapters\tRust book\n"));
    }

    #[test]
    fn no_target_shows_dash() {
        let mut store = GoalStore::default();
        let goal = store.create_goal(NewGoal::new("Walk", Category::General)).clone();
        let row = GoalRow::from_goal(&goal);
        assert_eq!(row.percent_label(), "-");

        let json = serde_json::to_value(&row).expect("json");
        assert_eq!(json["state"], "no_target");
        assert!(json.get("unit").is_none());
    }
}
