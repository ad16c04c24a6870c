pub mod category;
pub mod goal;

pub use category::{Category, CategoryColor, ParseCategoryError};
pub use goal::{AppData, Goal, GoalEntry, Reconciliation, format_number};
