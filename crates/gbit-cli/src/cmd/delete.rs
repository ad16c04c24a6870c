//! `gbit delete`: remove a goal and its entries.

use clap::Args;
use serde::Serialize;

use super::Context;
use crate::output::render;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Goal ID or unique prefix.
    pub goal: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Deleted {
    id: String,
    title: String,
    entries: usize,
}

pub fn run_delete(args: &DeleteArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.load_store();
    let goal_id = ctx.resolve_goal(&store, &args.goal)?;
    let removed = store
        .delete_goal(&goal_id)
        .map_err(|err| ctx.store_error(&err))?;
    let saved = ctx.save(&store);

    let report = Deleted {
        entries: removed.entries().len(),
        id: removed.id,
        title: removed.title,
    };
    render(ctx.output, &report, |r, w| {
        writeln!(w, "✓ Deleted {} ({} entries)", r.title, r.entries)
    })?;
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::context;
    use gbit_core::{Category, NewGoal};

    #[test]
    fn delete_removes_goal_and_second_delete_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir.path().join("goals.json"));
        let mut store = ctx.load_store();
        let id = store.create_goal(NewGoal::new("Walk", Category::General)).id.clone();
        store.create_goal(NewGoal::new("Read", Category::Book));
        ctx.save(&store).expect("save");

        let args = DeleteArgs { goal: id.clone() };
        run_delete(&args, &ctx).expect("delete");
        let titles: Vec<String> = ctx.load_store().goals().iter().map(|g| g.title.clone()).collect();
        assert_eq!(titles, ["Read"]);

        assert!(run_delete(&args, &ctx).is_err());
    }
}
