//! `gbit new`: create a goal.

use clap::Args;
use gbit_core::input::{normalize_link, parse_numeric};
use gbit_core::model::format_number;
use gbit_core::{Goal, NewGoal};
use std::io::{self, Write};

use super::Context;
use crate::output::render;

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Goal title.
    #[arg(long)]
    pub title: String,

    /// learning, book, money, or general.
    #[arg(long, default_value = "general")]
    pub category: String,

    /// Numeric target. Omit (or 0) to track activity only.
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Optional reference URL.
    #[arg(long)]
    pub link: Option<String>,
}

pub fn run_new(args: &NewArgs, ctx: &Context) -> anyhow::Result<()> {
    let category = ctx.parse_category(&args.category)?;
    let target = args.target.as_deref().map_or(0.0, parse_numeric);
    let new_goal = NewGoal::new(args.title.trim(), category)
        .target(target)
        .link(normalize_link(args.link.as_deref()));

    let mut store = ctx.load_store();
    let goal = store.create_goal(new_goal).clone();
    let saved = ctx.save(&store);

    render(ctx.output, &goal, write_created)?;
    saved
}

fn write_created(goal: &Goal, w: &mut dyn Write) -> io::Result<()> {
    let target = if goal.has_target() {
        format!(" (target {})", format_number(goal.target_value))
    } else {
        String::new()
    };
    writeln!(w, "✓ Created {} goal {}{target}", goal.category, goal.title)?;
    writeln!(w, "  id: {}", goal.id)
}
