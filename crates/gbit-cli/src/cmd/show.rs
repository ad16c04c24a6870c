//! `gbit show`: goal detail with cumulative series and entry history.
//!
//! The series is ordered by logging time and seeded with a zero point on
//! January 1 of the tracked year. History is newest first.

use clap::Args;
use gbit_core::calendar::year_start;
use gbit_core::model::format_number;
use gbit_core::series::{SeriesPoint, cumulative_series};
use gbit_core::{Goal, GoalEntry};
use serde::Serialize;
use std::io::{self, Write};

use super::Context;
use super::list::GoalRow;
use crate::output::{
    CliError, progress_bar, pretty_kv, pretty_rule, pretty_section, render_error, render_mode,
};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Goal ID or unique prefix.
    pub goal: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDetail {
    #[serde(flatten)]
    pub row: GoalRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub series: Vec<SeriesPoint>,
    pub history: Vec<GoalEntry>,
}

impl GoalDetail {
    fn new(goal: &Goal, series: Vec<SeriesPoint>) -> Self {
        Self {
            row: GoalRow::from_goal(goal),
            link: goal.link.clone(),
            series,
            history: goal.history().into_iter().cloned().collect(),
        }
    }
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.load_store();
    let goal_id = ctx.resolve_goal(&store, &args.goal)?;
    let Some(goal) = store.goal(&goal_id) else {
        anyhow::bail!("goal '{goal_id}' vanished after resolution");
    };

    let start = match year_start(ctx.config.year) {
        Ok(start) => start,
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };
    let detail = GoalDetail::new(goal, cumulative_series(goal.entries(), start));

    render_mode(ctx.output, &detail, write_text, write_pretty)
}

fn write_text(detail: &GoalDetail, w: &mut dyn Write) -> io::Result<()> {
    let row = &detail.row;
    writeln!(w, "id\t{}", row.id)?;
    writeln!(w, "title\t{}", row.title)?;
    writeln!(w, "category\t{}", row.category)?;
    writeln!(w, "state\t{}", row.state.as_str())?;
    writeln!(w, "percent\t{}", row.percent)?;
    writeln!(w, "progress\t{}", row.summary)?;
    if let Some(link) = &detail.link {
        writeln!(w, "link\t{link}")?;
    }
    for point in &detail.series {
        writeln!(w, "point\t{}\t{}\t{}", point.date, point.label, format_number(point.total))?;
    }
    for entry in &detail.history {
        writeln!(
            w,
            "entry\t{}\t{}\t{}\t{}",
            entry.id,
            entry.date,
            format_number(entry.value),
            entry.description
        )?;
    }
    Ok(())
}

fn write_pretty(detail: &GoalDetail, w: &mut dyn Write) -> io::Result<()> {
    let row = &detail.row;
    pretty_section(w, &row.title)?;
    pretty_kv(w, "ID", &row.id)?;
    pretty_kv(w, "Category", &row.category)?;
    pretty_kv(w, "Progress", &row.summary)?;
    if row.target_value > 0.0 {
        pretty_kv(w, "Complete", format!("{} {}%", progress_bar(row.percent, 20), row.percent))?;
    }
    pretty_kv(w, "State", row.state.as_str())?;
    if let Some(link) = &detail.link {
        pretty_kv(w, "Link", link)?;
    }

    writeln!(w)?;
    pretty_section(w, "Cumulative progress")?;
    let peak = detail
        .series
        .iter()
        .map(|p| p.total)
        .fold(0.0_f64, f64::max);
    for point in &detail.series {
        writeln!(
            w,
            "{:<8} {:>10}  {}",
            point.label,
            format_number(point.total),
            spark(point.total, peak)
        )?;
    }

    writeln!(w)?;
    pretty_section(w, &format!("History ({})", detail.history.len()))?;
    if detail.history.is_empty() {
        writeln!(w, "No entries yet. Log one with `gbit log {}`.", short(&row.id))?;
    }
    for entry in &detail.history {
        writeln!(
            w,
            "{}  {:>8}  {}  [{}]",
            entry.date,
            signed(entry.value),
            entry.description,
            short(&entry.id)
        )?;
    }
    pretty_rule(w)
}

fn short(id: &str) -> String {
    id.chars().take(8).collect()
}

fn signed(value: f64) -> String {
    if value < 0.0 {
        format_number(value)
    } else {
        format!("+{}", format_number(value))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn spark(total: f64, peak: f64) -> String {
    const WIDTH: f64 = 30.0;
    if peak <= 0.0 || total <= 0.0 {
        return String::new();
    }
    // total <= peak, so the width is within 0..=WIDTH.
    "▇".repeat((total / peak * WIDTH).round() as usize)
}
