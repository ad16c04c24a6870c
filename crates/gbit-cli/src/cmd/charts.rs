//! `gbit charts`: category breakdown and completion status.

use clap::Args;
use gbit_core::progress::{CategoryProgress, StatusSummary, category_breakdown, status_summary};
use serde::Serialize;
use std::io::{self, Write};

use super::Context;
use crate::output::{pretty_section, progress_bar, render_mode};

const BAR_WIDTH: usize = 24;

#[derive(Args, Debug, Default)]
pub struct ChartsArgs {}

#[derive(Debug, Serialize)]
pub struct ChartsReport {
    pub categories: Vec<CategoryProgress>,
    pub status: StatusSummary,
}

pub fn run_charts(_args: &ChartsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.load_store();
    let report = ChartsReport {
        categories: category_breakdown(store.goals()),
        status: status_summary(store.goals()),
    };
    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn write_text(report: &ChartsReport, w: &mut dyn Write) -> io::Result<()> {
    for row in &report.categories {
        writeln!(w, "category\t{}\t{}\t{}", row.category, row.progress, row.goals)?;
    }
    writeln!(w, "completed\t{}", report.status.completed)?;
    writeln!(w, "in_progress\t{}", report.status.in_progress)
}

fn write_pretty(report: &ChartsReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Progress by category")?;
    if report.categories.is_empty() {
        writeln!(w, "No goals yet.")?;
    }
    for row in &report.categories {
        writeln!(
            w,
            "{:<9} {} {:>3}%  ({} goals)",
            row.category.as_str(),
            progress_bar(row.progress, BAR_WIDTH),
            row.progress,
            row.goals
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Goal status")?;
    let status = report.status;
    writeln!(w, "Completed    {}", status.completed)?;
    writeln!(w, "In progress  {}", status.in_progress)?;
    if status.total() > 0 {
        let done = status.completed * 100 / status.total();
        writeln!(w, "{}", progress_bar(u8::try_from(done).unwrap_or(100), BAR_WIDTH))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gbit_core::{Category, GoalStore, NewGoal};

    fn report() -> ChartsReport {
        let mut store = GoalStore::default();
        let day = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let done = store
            .create_goal(NewGoal::new("Book", Category::Book).target(2.0))
            .id
            .clone();
        store.add_entry(&done, day, 3.0, "").expect("add");
        let walk = store.create_goal(NewGoal::new("Walk", Category::General)).id.clone();
        store.add_entry(&walk, day, 1.0, "").expect("add");

        ChartsReport {
            categories: category_breakdown(store.goals()),
            status: status_summary(store.goals()),
        }
    }

    #[test]
    fn text_rows_in_category_order() {
        let mut buf = Vec::new();
        write_text(&report(), &mut buf).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "category\tBook\t100\t1\ncategory\tGeneral\t10\t1\ncompleted\t1\nin_progress\t1\n"
        );
    }

    #[test]
    fn pretty_mentions_both_sections() {
        let mut buf = Vec::new();
        write_pretty(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Progress by category"));
        assert!(text.contains("Completed    1"));
    }
}
