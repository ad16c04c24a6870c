//! `gbit edit`: change a goal's title, category, target, or link.

use clap::Args;
use gbit_core::input::{normalize_link, parse_numeric};
use gbit_core::{Goal, GoalPatch};
use std::io::{self, Write};

use super::Context;
use crate::output::{CliError, render, render_error};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Goal ID or unique prefix.
    pub goal: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New category. The goal keeps its current unit.
    #[arg(long)]
    pub category: Option<String>,

    /// New numeric target; 0 removes the target.
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<String>,

    /// New link; an empty value clears it.
    #[arg(long)]
    pub link: Option<String>,
}

impl EditArgs {
    fn patch(&self, ctx: &Context) -> anyhow::Result<GoalPatch> {
        let category = self
            .category
            .as_deref()
            .map(|raw| ctx.parse_category(raw))
            .transpose()?;
        Ok(GoalPatch {
            title: self.title.as_deref().map(str::trim).map(str::to_string),
            category,
            target_value: self.target.as_deref().map(parse_numeric),
            link: self.link.as_deref().map(|raw| normalize_link(Some(raw))),
        })
    }
}

pub fn run_edit(args: &EditArgs, ctx: &Context) -> anyhow::Result<()> {
    let patch = args.patch(ctx)?;
    if patch.is_empty() {
        render_error(
            ctx.output,
            &CliError::with_details(
                "nothing to change",
                "pass at least one of --title, --category, --target, --link",
                "no_changes",
            ),
        )?;
        anyhow::bail!("nothing to change");
    }

    let mut store = ctx.load_store();
    let goal_id = ctx.resolve_goal(&store, &args.goal)?;
    let goal = store
        .update_goal(&goal_id, patch)
        .map_err(|err| ctx.store_error(&err))?
        .clone();
    let saved = ctx.save(&store);

    render(ctx.output, &goal, write_updated)?;
    saved
}

fn write_updated(goal: &Goal, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "✓ Updated {} ({})", goal.title, goal.category)?;
    writeln!(w, "  {}", goal.summary_line())
}
