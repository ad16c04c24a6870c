//! `gbit log`: append an entry to a goal.
//!
//! The date defaults to today's local calendar date. Goals without a target
//! (other than Money) log a value of 1 when none is given; every other goal
//! needs `--value`.

use chrono::{Local, NaiveDate};
use clap::Args;
use gbit_core::input::parse_numeric;
use gbit_core::model::format_number;
use gbit_core::{Goal, GoalEntry};
use serde::Serialize;

use super::Context;
use crate::output::{CliError, render, render_error};

/// Value logged against activity-only goals.
const ACTIVITY_VALUE: f64 = 1.0;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Goal ID or unique prefix.
    pub goal: String,

    /// What was done.
    #[arg(long, short = 'd')]
    pub description: String,

    /// Amount of progress. Required for goals with a target and for money goals.
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Entry date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Logged {
    goal_id: String,
    title: String,
    entry: GoalEntry,
    current_value: f64,
    summary: String,
}

/// `None` when the goal needs an explicit value and none was given.
fn entry_value(goal: &Goal, raw: Option<&str>) -> Option<f64> {
    match raw {
        Some(raw) => Some(parse_numeric(raw)),
        None if goal.needs_value() => None,
        None => Some(ACTIVITY_VALUE),
    }
}

pub fn run_log(args: &LogArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.load_store();
    let goal_id = ctx.resolve_goal(&store, &args.goal)?;
    let Some(goal) = store.goal(&goal_id) else {
        anyhow::bail!("goal '{goal_id}' vanished after resolution");
    };

    let Some(value) = entry_value(goal, args.value.as_deref()) else {
        render_error(
            ctx.output,
            &CliError::with_details(
                format!("goal '{}' needs a value", goal.title),
                "pass --value <N>",
                "value_required",
            ),
        )?;
        anyhow::bail!("missing --value for goal '{goal_id}'");
    };

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let entry = store
        .add_entry(&goal_id, date, value, args.description.trim())
        .map_err(|err| ctx.store_error(&err))?;
    let saved = ctx.save(&store);

    let Some(goal) = store.goal(&goal_id) else {
        anyhow::bail!("goal '{goal_id}' vanished after logging");
    };
    let report = Logged {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        entry,
        current_value: goal.current_value(),
        summary: goal.summary_line(),
    };
    render(ctx.output, &report, |r, w| {
        writeln!(
            w,
            "✓ Logged {} on {} for {}: {}",
            format_number(r.entry.value),
            r.entry.date,
            r.title,
            r.summary
        )
    })?;
    saved
}
