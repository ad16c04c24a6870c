//! `gbit verify`: compare stored running totals with their entries.

use anyhow::Result;
use clap::Args;
use gbit_core::model::{Reconciliation, format_number};
use gbit_core::storage::{load_document_raw, save_document};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::Context;
use crate::output::{CliError, render, render_error};

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Rewrite drifted totals from their entries.
    #[arg(long)]
    pub fix: bool,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    path: PathBuf,
    goals: usize,
    entries: usize,
    drift: Vec<Reconciliation>,
    fixed: bool,
}

impl VerifyReport {
    fn is_ok(&self) -> bool {
        self.drift.is_empty() || self.fixed
    }
}

/// Load the raw document, report drift, and optionally save the fix.
///
/// # Errors
///
/// Fails when the document is unreadable, when drift remains unfixed, or
/// when the fixed document cannot be saved.
pub fn run_verify(args: &VerifyArgs, ctx: &Context) -> Result<()> {
    let path = &ctx.config.data_path;
    let mut data = match load_document_raw(path) {
        Ok(data) => data,
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    let drift = data.drift();
    let mut fixed = false;
    if args.fix && !drift.is_empty() {
        data.reconcile();
        if let Err(err) = save_document(path, &data) {
            render_error(ctx.output, &CliError::from(&err))?;
            return Err(err.into());
        }
        info!(goals = drift.len(), "rewrote drifted totals");
        fixed = true;
    }

    let report = VerifyReport {
        path: path.clone(),
        goals: data.goals.len(),
        entries: data.goals.iter().map(|g| g.entries().len()).sum(),
        drift,
        fixed,
    };

    render(ctx.output, &report, |r, w| {
        for item in &r.drift {
            let status = if r.fixed { "FIX" } else { "FAIL" };
            writeln!(
                w,
                "{status:<4} {} stored {} but entries sum to {}",
                item.title,
                format_number(item.stored),
                format_number(item.computed)
            )?;
        }
        writeln!(
            w,
            "checked {} goals, {} entries in {}",
            r.goals,
            r.entries,
            r.path.display()
        )
    })?;

    if report.is_ok() {
        Ok(())
    } else {
        anyhow::bail!(
            "verify: {} goal(s) out of sync; run `gbit verify --fix`",
            report.drift.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::context;
    use chrono::NaiveDate;
    use gbit_core::{Category, GoalStore, NewGoal};
    use std::fs;

    fn write_drifted(path: &std::path::Path) {
        let mut store = GoalStore::default();
        let id = store
            .create_goal(NewGoal::new("Read", Category::Book).target(10.0))
            .id
            .clone();
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).expect("date");
        store.add_entry(&id, day, 4.0, "").expect("add");
        let mut json = serde_json::to_value(store.data()).expect("json");
        json["goals"][0]["currentValue"] = serde_json::json!(7);
        fs::write(path, json.to_string()).expect("write");
    }

    #[test]
    fn clean_document_passes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir.path().join("goals.json"));
        assert!(run_verify(&VerifyArgs::default(), &ctx).is_ok());
    }

    #[test]
    fn drift_fails_until_fixed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("goals.json");
        write_drifted(&path);
        let ctx = context(&path);

        assert!(run_verify(&VerifyArgs { fix: false }, &ctx).is_err());
        assert!(run_verify(&VerifyArgs { fix: true }, &ctx).is_ok());
        assert!(run_verify(&VerifyArgs { fix: false }, &ctx).is_ok());
        assert!(load_document_raw(&path).expect("raw").drift().is_empty());
    }

    #[test]
    fn unreadable_document_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("goals.json");
        fs::write(&path, "nope").expect("write");
        assert!(run_verify(&VerifyArgs::default(), &context(&path)).is_err());
    }
}
