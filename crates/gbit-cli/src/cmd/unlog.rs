//! `gbit unlog`: remove an entry and take its value back out of the total.

use clap::Args;
use gbit_core::GoalEntry;
use gbit_core::model::format_number;
use serde::Serialize;

use super::Context;
use crate::output::render;

#[derive(Args, Debug)]
pub struct UnlogArgs {
    /// Goal ID or unique prefix.
    pub goal: String,

    /// Entry ID or unique prefix (see `gbit show`).
    pub entry: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Unlogged {
    goal_id: String,
    removed: GoalEntry,
    current_value: f64,
    summary: String,
}

pub fn run_unlog(args: &UnlogArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.load_store();
    let goal_id = ctx.resolve_goal(&store, &args.goal)?;
    let removed = store
        .resolve_entry_id(&goal_id, &args.entry)
        .and_then(|entry_id| store.delete_entry(&goal_id, &entry_id))
        .map_err(|err| ctx.store_error(&err))?;
    let saved = ctx.save(&store);

    let Some(goal) = store.goal(&goal_id) else {
        anyhow::bail!("goal '{goal_id}' vanished after unlogging");
    };
    let report = Unlogged {
        goal_id: goal.id.clone(),
        removed,
        current_value: goal.current_value(),
        summary: goal.summary_line(),
    };
    render(ctx.output, &report, |r, w| {
        writeln!(
            w,
            "✓ Removed {} from {}: {}",
            format_number(r.removed.value),
            r.removed.date,
            r.summary
        )
    })?;
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::context;
    use chrono::NaiveDate;
    use gbit_core::{Category, NewGoal};

    #[test]
    fn unlog_restores_total_and_rejects_repeat() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir.path().join("goals.json"));
        let mut store = ctx.load_store();
        let id = store
            .create_goal(NewGoal::new("Save", Category::Money))
            .id
            .clone();
        let day = NaiveDate::from_ymd_opt(2026, 5, 1).expect("date");
        store.add_entry(&id, day, 100.0, "salary").expect("add");
        let refund = store.add_entry(&id, day, -30.0, "refund").expect("add");
        ctx.save(&store).expect("save");

        let args = UnlogArgs {
            goal: id.clone(),
            entry: refund.id[..8].to_string(),
        };
        run_unlog(&args, &ctx).expect("unlog");

        let store = ctx.load_store();
        let goal = store.goal(&id).expect("goal");
        assert!((goal.current_value() - 100.0).abs() < f64::EPSILON);
        assert!(run_unlog(&args, &ctx).is_err());
    }
}
