//! Command handlers. Each `run_*` loads the document through [`Context`],
//! works on a [`GoalStore`], and saves at most once.

pub mod charts;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod heatmap;
pub mod list;
pub mod log;
pub mod new;
pub mod show;
pub mod unlog;
pub mod verify;

use gbit_core::config::EffectiveConfig;
use gbit_core::storage::{load_document, save_document};
use gbit_core::{Category, GoalStore, StoreError};
use tracing::error;

use crate::output::{CliError, OutputMode, render_error};

/// Resolved settings shared by every command.
#[derive(Debug)]
pub struct Context {
    pub output: OutputMode,
    pub config: EffectiveConfig,
}

impl Context {
    pub const fn new(output: OutputMode, config: EffectiveConfig) -> Self {
        Self { output, config }
    }

    /// Load the document into a store that uses the configured units.
    pub fn load_store(&self) -> GoalStore {
        GoalStore::with_units(
            load_document(&self.config.data_path),
            self.config.config.units.clone(),
        )
    }

    /// Persist the store.
    ///
    /// A failed save is logged and reported here. In-memory state stays
    /// intact, so callers print their result first and return this last.
    pub fn save(&self, store: &GoalStore) -> anyhow::Result<()> {
        save_document(&self.config.data_path, store.data()).map_err(|err| {
            error!(error = %err, path = %self.config.data_path.display(), "failed to save goal document");
            let rendered = render_error(self.output, &CliError::from(&err));
            reported(err, rendered)
        })
    }

    /// Resolve a goal id or prefix, rendering the error on failure.
    pub fn resolve_goal(&self, store: &GoalStore, raw: &str) -> anyhow::Result<String> {
        store
            .resolve_goal_id(raw)
            .map_err(|err| self.store_error(&err))
    }

    /// Render a store error and turn it into the command's failure.
    pub fn store_error(&self, err: &StoreError) -> anyhow::Error {
        let rendered = render_error(self.output, &CliError::from(err));
        reported(err.clone(), rendered)
    }

    /// Parse a category name, rendering `E2004` on failure.
    pub fn parse_category(&self, raw: &str) -> anyhow::Result<Category> {
        raw.parse::<Category>().map_err(|err| {
            let rendered = render_error(self.output, &CliError::from_code(err.to_string(), err.code()));
            reported(err, rendered)
        })
    }
}

/// The command's failure for `err`. A failed render is attached as context;
/// `err` stays the root cause.
fn reported<E>(err: E, rendered: anyhow::Result<()>) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let err = anyhow::Error::new(err);
    match rendered {
        Ok(()) => err,
        Err(render_err) => err.context(format!("could not report error: {render_err}")),
    }
}
