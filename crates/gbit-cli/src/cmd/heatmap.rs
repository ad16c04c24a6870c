//! `gbit heatmap`: one year of logging activity, one cell per day.
//!
//! ```text
//!      Jan       Feb
//!          ░░    ▒▒
//! Mon    ··  ··
//!     ...
//! ```
//!
//! Rows are weekdays Sunday through Saturday; columns are weeks. Each cell
//! is two characters wide.

use clap::Args;
use gbit_core::aggregate::{DayCounts, Intensity, cell_tooltip, count_on, counts_by_day_for_goals};
use gbit_core::calendar::{MonthLabel, YearGrid, build_year_grid};
use serde::Serialize;
use std::io::{self, Write};

use super::Context;
use crate::output::{CliError, render_error, render_mode};

const CELL_WIDTH: usize = 2;
const ROW_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];
const ROW_LABEL_WIDTH: usize = 4;

#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// Calendar year. Defaults to the configured tracker year.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    pub year: i32,
    pub total_entries: u32,
    pub active_days: usize,
    pub month_labels: Vec<MonthLabel>,
    pub weeks: Vec<Vec<Option<HeatmapCell>>>,
}

#[derive(Debug, Serialize)]
pub struct HeatmapCell {
    pub date: chrono::NaiveDate,
    pub count: u32,
    pub intensity: Intensity,
    pub tooltip: String,
}

impl HeatmapReport {
    pub fn new(grid: &YearGrid, counts: &DayCounts) -> Self {
        let weeks: Vec<Vec<Option<HeatmapCell>>> = grid
            .weeks
            .iter()
            .map(|week| {
                week.iter()
                    .map(|slot| {
                        slot.map(|date| {
                            let count = count_on(counts, date);
                            HeatmapCell {
                                date,
                                count,
                                intensity: Intensity::from_count(count),
                                tooltip: cell_tooltip(date, count),
                            }
                        })
                    })
                    .collect()
            })
            .collect();

        let in_year = weeks.iter().flatten().flatten();
        let total_entries = in_year.clone().map(|c| c.count).sum();
        let active_days = in_year.filter(|c| c.count > 0).count();

        Self {
            year: grid.year,
            total_entries,
            active_days,
            month_labels: grid.month_labels.clone(),
            weeks,
        }
    }
}

pub fn run_heatmap(args: &HeatmapArgs, ctx: &Context) -> anyhow::Result<()> {
    let year = args.year.unwrap_or(ctx.config.year);
    let grid = match build_year_grid(year) {
        Ok(grid) => grid,
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    let store = ctx.load_store();
    let counts = counts_by_day_for_goals(store.goals());
    let report = HeatmapReport::new(&grid, &counts);

    render_mode(ctx.output, &report, write_text, write_pretty)
}

/// Active days only: `date<TAB>count<TAB>intensity`.
fn write_text(report: &HeatmapReport, w: &mut dyn Write) -> io::Result<()> {
    for cell in report.weeks.iter().flatten().flatten() {
        if cell.count > 0 {
            writeln!(w, "{}\t{}\t{}", cell.date, cell.count, cell.intensity.as_str())?;
        }
    }
    Ok(())
}

fn write_pretty(report: &HeatmapReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "{} logs on {} days in {}",
        report.total_entries, report.active_days, report.year
    )?;
    writeln!(w)?;
    writeln!(w, "{}", month_row(&report.month_labels, report.weeks.len()))?;

    for (row, label) in ROW_LABELS.iter().enumerate() {
        write!(w, "{label:<ROW_LABEL_WIDTH$}")?;
        for week in &report.weeks {
            let glyph = week[row]
                .as_ref()
                .map_or("  ", |cell| intensity_glyph(cell.intensity));
            write!(w, "{glyph}")?;
        }
        writeln!(w)?;
    }

    writeln!(w)?;
    write!(w, "{:ROW_LABEL_WIDTH$}Less ", "")?;
    for tier in Intensity::ALL {
        write!(w, "{} ", intensity_glyph(tier))?;
    }
    writeln!(w, "More")
}

/// Month names placed over the week column holding each month's 1st.
/// A label that would overlap the previous one is dropped.
fn month_row(labels: &[MonthLabel], weeks: usize) -> String {
    let width = ROW_LABEL_WIDTH + weeks * CELL_WIDTH;
    let mut row = " ".repeat(width);
    let mut next_free = 0;
    for label in labels {
        let at = ROW_LABEL_WIDTH + label.week_index * CELL_WIDTH;
        if at < next_free || at + label.label.len() > width {
            continue;
        }
        row.replace_range(at..at + label.label.len(), &label.label);
        next_free = at + label.label.len() + 1;
    }
    row.trim_end().to_string()
}

const fn intensity_glyph(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::None => "··",
        Intensity::Low => "░░",
        Intensity::Medium => "▒▒",
        Intensity::High => "██",
    }
}
