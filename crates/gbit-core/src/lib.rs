//! gbit-core: goal model, progress aggregation, and calendar projection.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per concern, each mapping to an
//!   [`error::ErrorCode`]. `anyhow::Result` only where config is loaded.
//! - **Logging**: `tracing` macros (`info!` for mutations, `warn!` for
//!   recovered faults, `debug!` for derivations).

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod input;
pub mod lock;
pub mod model;
pub mod progress;
pub mod series;
pub mod storage;
pub mod store;

pub use error::ErrorCode;
pub use model::{AppData, Category, Goal, GoalEntry};
pub use store::{GoalPatch, GoalStore, NewGoal, StoreError};
