//! The goal store: canonical, mutable state for one document.
//!
//! # Invariants
//!
//! - For every goal, `current_value == sum(entries[*].value)` after every
//!   public call returns. Entry mutations update both in one step.
//! - Goals keep insertion order; nothing here reorders them.
//! - Goal edits never touch `current_value` or `entries`.
//! - Entry timestamps are strictly increasing across the store:
//!   `ts = max(now_ms, last + 1)`, so logging order survives same-millisecond
//!   writes.
//! - A stale id is an `Err`, never a partial mutation.
//! - Wrapping a document recomputes drifted totals, so the first invariant
//!   holds from construction on.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate;
use crate::config::UnitsConfig;
use crate::error::ErrorCode;
use crate::model::{AppData, Category, Goal, GoalEntry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("goal not found: {goal_id}")]
    GoalNotFound { goal_id: String },

    #[error("entry {entry_id} not found on goal {goal_id}")]
    EntryNotFound { goal_id: String, entry_id: String },

    #[error("ambiguous id prefix '{prefix}': matches {matches} records")]
    AmbiguousId { prefix: String, matches: usize },
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::GoalNotFound { .. } => ErrorCode::GoalNotFound,
            Self::EntryNotFound { .. } => ErrorCode::EntryNotFound,
            Self::AmbiguousId { .. } => ErrorCode::AmbiguousId,
        }
    }

    /// True for stale-reference errors the caller may treat as a no-op.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::GoalNotFound { .. } | Self::EntryNotFound { .. })
    }
}

/// Fields for a new goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub category: Category,
    pub target_value: f64,
    pub link: Option<String>,
}

impl NewGoal {
    #[must_use]
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category,
            target_value: 0.0,
            link: None,
        }
    }

    #[must_use]
    pub const fn target(mut self, target_value: f64) -> Self {
        self.target_value = target_value;
        self
    }

    #[must_use]
    pub fn link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// Replacement values for a goal's editable fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub target_value: Option<f64>,
    /// `Some(None)` clears the link.
    pub link: Option<Option<String>>,
}

impl GoalPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.target_value.is_none()
            && self.link.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalStore {
    data: AppData,
    units: UnitsConfig,
    last_timestamp: i64,
}

impl GoalStore {
    /// Wrap a loaded document, using the built-in unit table.
    #[must_use]
    pub fn new(data: AppData) -> Self {
        Self::with_units(data, UnitsConfig::default())
    }

    /// Wrap a document, recomputing any drifted totals first.
    #[must_use]
    pub fn with_units(mut data: AppData, units: UnitsConfig) -> Self {
        for fix in data.reconcile() {
            warn!(
                goal_id = %fix.goal_id,
                stored = fix.stored,
                computed = fix.computed,
                "current value disagreed with entries; recomputed"
            );
        }
        let last_timestamp = data
            .goals
            .iter()
            .flat_map(Goal::entries)
            .map(|e| e.timestamp)
            .max()
            .unwrap_or(0);
        Self {
            data,
            units,
            last_timestamp,
        }
    }

    /// The full goal list in display order.
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.data.goals
    }

    #[must_use]
    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.data.goals.iter().find(|g| g.id == goal_id)
    }

    #[must_use]
    pub const fn data(&self) -> &AppData {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> AppData {
        self.data
    }

    /// Resolve a full id or unique id prefix to a goal id.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`] when nothing matches,
    /// [`StoreError::AmbiguousId`] when a prefix matches several goals.
    pub fn resolve_goal_id(&self, raw: &str) -> Result<String, StoreError> {
        resolve_prefix(raw, self.data.goals.iter().map(|g| g.id.as_str())).ok_or_else(|| {
            StoreError::GoalNotFound {
                goal_id: raw.trim().to_string(),
            }
        })?
    }

    /// Resolve a full id or unique id prefix to an entry id on `goal_id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`], [`StoreError::EntryNotFound`], or
    /// [`StoreError::AmbiguousId`].
    pub fn resolve_entry_id(&self, goal_id: &str, raw: &str) -> Result<String, StoreError> {
        let goal = self.goal(goal_id).ok_or_else(|| StoreError::GoalNotFound {
            goal_id: goal_id.to_string(),
        })?;
        resolve_prefix(raw, goal.entries.iter().map(|e| e.id.as_str())).ok_or_else(|| {
            StoreError::EntryNotFound {
                goal_id: goal_id.to_string(),
                entry_id: raw.trim().to_string(),
            }
        })?
    }

    /// Append a new goal with `current_value = 0`, no entries, and the
    /// category's default unit.
    pub fn create_goal(&mut self, new_goal: NewGoal) -> &Goal {
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            title: new_goal.title,
            category: new_goal.category,
            description: None,
            target_value: new_goal.target_value,
            current_value: 0.0,
            unit: self.units.unit_for(new_goal.category),
            link: new_goal.link,
            entries: Vec::new(),
        };
        info!(goal_id = %goal.id, category = %goal.category, "created goal");
        self.data.goals.push(goal);
        let last = self.data.goals.len() - 1;
        &self.data.goals[last]
    }

    /// Replace a goal's editable fields.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`] if `goal_id` is unknown.
    pub fn update_goal(&mut self, goal_id: &str, patch: GoalPatch) -> Result<&Goal, StoreError> {
        let goal = self.goal_mut(goal_id)?;
        if let Some(title) = patch.title {
            goal.title = title;
        }
        if let Some(category) = patch.category {
            goal.category = category;
        }
        if let Some(target_value) = patch.target_value {
            goal.target_value = target_value;
        }
        if let Some(link) = patch.link {
            goal.link = link;
        }
        info!(goal_id, "updated goal");
        Ok(&*goal)
    }

    /// Remove a goal and all of its entries.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`] if `goal_id` is unknown.
    pub fn delete_goal(&mut self, goal_id: &str) -> Result<Goal, StoreError> {
        let index = self
            .data
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::GoalNotFound {
                goal_id: goal_id.to_string(),
            })?;
        let removed = self.data.goals.remove(index);
        info!(goal_id, entries = removed.entries.len(), "deleted goal");
        Ok(removed)
    }

    /// Log progress: append an entry and add its value to the goal total.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`] if `goal_id` is unknown.
    pub fn add_entry(
        &mut self,
        goal_id: &str,
        date: NaiveDate,
        value: f64,
        description: impl Into<String>,
    ) -> Result<GoalEntry, StoreError> {
        let timestamp = self.next_timestamp();
        let goal = self.goal_mut(goal_id)?;
        let entry = GoalEntry {
            id: Uuid::new_v4().to_string(),
            date,
            description: description.into(),
            value,
            timestamp,
        };

        goal.current_value += entry.value;
        goal.entries.push(entry.clone());
        self.last_timestamp = timestamp;

        info!(goal_id, entry_id = %entry.id, date = %entry.date, value, "added entry");
        Ok(entry)
    }

    /// Remove an entry and take its value back out of the goal total.
    ///
    /// # Errors
    ///
    /// [`StoreError::GoalNotFound`] / [`StoreError::EntryNotFound`] for stale
    /// ids; state is unchanged in both cases.
    pub fn delete_entry(&mut self, goal_id: &str, entry_id: &str) -> Result<GoalEntry, StoreError> {
        let goal = self.goal_mut(goal_id)?;
        let index = goal
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| StoreError::EntryNotFound {
                goal_id: goal_id.to_string(),
                entry_id: entry_id.to_string(),
            })?;

        let removed = goal.entries.remove(index);
        // Refold rather than subtract so the stored total stays bit-equal to
        // the entry sum under floating point.
        goal.current_value = aggregate::sum_values(&goal.entries);
        debug!(goal_id, current_value = goal.current_value, "recomputed total");
        info!(goal_id, entry_id, value = removed.value, "deleted entry");
        Ok(removed)
    }

    fn goal_mut(&mut self, goal_id: &str) -> Result<&mut Goal, StoreError> {
        self.data
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::GoalNotFound {
                goal_id: goal_id.to_string(),
            })
    }

    fn next_timestamp(&self) -> i64 {
        Utc::now()
            .timestamp_millis()
            .max(self.last_timestamp.saturating_add(1))
    }
}

/// Exact match first, then a unique prefix. `None` when nothing matches.
fn resolve_prefix<'a>(
    raw: &str,
    ids: impl Iterator<Item = &'a str> + Clone,
) -> Option<Result<String, StoreError>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if ids.clone().any(|id| id == raw) {
        return Some(Ok(raw.to_string()));
    }

    let mut matches: Vec<&str> = ids.filter(|id| id.starts_with(raw)).collect();
    match matches.len() {
        0 => None,
        1 => Some(Ok(matches.remove(0).to_string())),
        n => Some(Err(StoreError::AmbiguousId {
            prefix: raw.to_string(),
            matches: n,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).expect("date")
    }

    fn store_with_goal(category: Category, target: f64) -> (GoalStore, String) {
        let mut store = GoalStore::default();
        let id = store
            .create_goal(NewGoal::new("Goal", category).target(target))
            .id
            .clone();
        (store, id)
    }

    #[test]
    fn create_goal_sets_defaults_and_appends() {
        let mut store = GoalStore::default();
        let first = store.create_goal(NewGoal::new("Rust book", Category::Book).target(20.0)).clone();
        let second = store.create_goal(NewGoal::new("Walk", Category::General)).clone();

        assert_ne!(first.id, second.id);
        assert!(first.current_value().abs() < f64::EPSILON);
        assert!(first.entries().is_empty());
        assert_eq!(first.unit.as_deref(), Some("chapters"));
        assert_eq!(second.unit, None);

        let titles: Vec<_> = store.goals().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Rust book", "Walk"]);
    }

    #[test]
    fn configured_units_override_defaults() {
        let units = UnitsConfig {
            money: Some("EUR".to_string()),
            ..UnitsConfig::default()
        };
        let mut store = GoalStore::with_units(AppData::default(), units);
        let goal = store.create_goal(NewGoal::new("Save", Category::Money));
        assert_eq!(goal.unit.as_deref(), Some("EUR"));
    }

    #[test]
    fn add_entry_increments_current_value() {
        let (mut store, id) = store_with_goal(Category::Book, 10.0);
        store.add_entry(&id, day(1, 5), 3.0, "ch 1-3").expect("add");
        store.add_entry(&id, day(1, 6), 2.0, "ch 4-5").expect("add");

        let goal = store.goal(&id).expect("goal");
        assert!((goal.current_value() - 5.0).abs() < f64::EPSILON);
        assert_eq!(goal.entries().len(), 2);
        assert_eq!(goal.entries()[0].description, "ch 1-3");
    }

    #[test]
    fn timestamps_strictly_increase() {
        let (mut store, id) = store_with_goal(Category::General, 0.0);
        let a = store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        let b = store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        let c = store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        assert!(a.timestamp < b.timestamp);
        assert!(b.timestamp < c.timestamp);
    }

    #[test]
    fn delete_entry_twice_is_not_found_and_no_op() {
        let (mut store, id) = store_with_goal(Category::Book, 10.0);
        let keep = store.add_entry(&id, day(2, 1), 4.0, "keep").expect("add");
        let gone = store.add_entry(&id, day(2, 2), 3.0, "gone").expect("add");

        store.delete_entry(&id, &gone.id).expect("first delete");
        let after_first = store.goal(&id).expect("goal").current_value();
        assert!((after_first - 4.0).abs() < f64::EPSILON);

        let err = store.delete_entry(&id, &gone.id).expect_err("second delete");
        assert!(err.is_not_found());
        assert_eq!(err.code(), ErrorCode::EntryNotFound);

        let goal = store.goal(&id).expect("goal");
        assert!((goal.current_value() - after_first).abs() < f64::EPSILON);
        assert_eq!(goal.entries().len(), 1);
        assert_eq!(goal.entries()[0].id, keep.id);
    }

    #[test]
    fn delete_negative_and_zero_entries_restores_total() {
        let (mut store, id) = store_with_goal(Category::Money, 0.0);
        let neg = store.add_entry(&id, day(3, 1), -50.0, "refund").expect("add");
        let zero = store.add_entry(&id, day(3, 2), 0.0, "check-in").expect("add");
        store.add_entry(&id, day(3, 3), 200.0, "salary").expect("add");

        store.delete_entry(&id, &neg.id).expect("delete");
        store.delete_entry(&id, &zero.id).expect("delete");
        let goal = store.goal(&id).expect("goal");
        assert!((goal.current_value() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_goal_leaves_state_unchanged() {
        let (mut store, id) = store_with_goal(Category::Book, 10.0);
        store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        let before = store.data().clone();

        assert!(matches!(
            store.add_entry("missing", day(1, 2), 5.0, ""),
            Err(StoreError::GoalNotFound { .. })
        ));
        assert!(store.delete_entry("missing", "x").is_err());
        assert!(store.update_goal("missing", GoalPatch::default()).is_err());
        assert!(store.delete_goal("missing").is_err());
        assert_eq!(store.data(), &before);
    }

    #[test]
    fn update_goal_never_touches_entries_or_total() {
        let (mut store, id) = store_with_goal(Category::Learning, 10.0);
        store.add_entry(&id, day(1, 1), 4.0, "").expect("add");

        let patch = GoalPatch {
            title: Some("Renamed".to_string()),
            category: Some(Category::Book),
            target_value: Some(40.0),
            link: Some(Some("https://example.com".to_string())),
        };
        let goal = store.update_goal(&id, patch).expect("update");

        assert_eq!(goal.title, "Renamed");
        assert_eq!(goal.category, Category::Book);
        assert!((goal.target_value - 40.0).abs() < f64::EPSILON);
        assert_eq!(goal.link.as_deref(), Some("https://example.com"));
        assert!((goal.current_value() - 4.0).abs() < f64::EPSILON);
        assert_eq!(goal.entries().len(), 1);
        // Unit stays with the goal across category edits.
        assert_eq!(goal.unit.as_deref(), Some("lessons"));

        let cleared = store
            .update_goal(
                &id,
                GoalPatch {
                    link: Some(None),
                    ..GoalPatch::default()
                },
            )
            .expect("clear link");
        assert!(cleared.link.is_none());
    }

    #[test]
    fn delete_goal_cascades() {
        let (mut store, id) = store_with_goal(Category::Book, 10.0);
        store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        let removed = store.delete_goal(&id).expect("delete");
        assert_eq!(removed.entries().len(), 1);
        assert!(store.goals().is_empty());
        assert!(store.delete_goal(&id).expect_err("gone").is_not_found());
    }

    #[test]
    fn resolve_accepts_unique_prefix() {
        let (mut store, id) = store_with_goal(Category::Book, 0.0);
        assert_eq!(store.resolve_goal_id(&id), Ok(id.clone()));
        assert_eq!(store.resolve_goal_id(&id[..8]), Ok(id.clone()));
        assert!(matches!(
            store.resolve_goal_id("zzzz"),
            Err(StoreError::GoalNotFound { .. })
        ));
        assert!(matches!(
            store.resolve_goal_id(""),
            Err(StoreError::GoalNotFound { .. })
        ));
    }

    #[test]
    fn resolve_rejects_ambiguous_prefix() {
        let mut store = GoalStore::default();
        store.create_goal(NewGoal::new("One", Category::Book));
        store.create_goal(NewGoal::new("Two", Category::Book));
        store.data.goals[0].id = "abc-1".to_string();
        store.data.goals[1].id = "abc-2".to_string();

        assert_eq!(
            store.resolve_goal_id("abc"),
            Err(StoreError::AmbiguousId {
                prefix: "abc".to_string(),
                matches: 2,
            })
        );
        assert_eq!(store.resolve_goal_id("abc-2"), Ok("abc-2".to_string()));
    }

    #[test]
    fn resolve_entry_by_prefix() {
        let (mut store, id) = store_with_goal(Category::Book, 0.0);
        let entry = store.add_entry(&id, day(4, 1), 1.0, "").expect("add");

        assert_eq!(store.resolve_entry_id(&id, &entry.id[..6]), Ok(entry.id.clone()));
        assert!(matches!(
            store.resolve_entry_id(&id, "nope"),
            Err(StoreError::EntryNotFound { .. })
        ));
        assert!(matches!(
            store.resolve_entry_id("missing", &entry.id),
            Err(StoreError::GoalNotFound { .. })
        ));
    }

    #[test]
    fn drifted_document_is_reconciled_on_wrap() {
        let raw = r#"{"goals":[{"id":"g","title":"Read","category":"Book","targetValue":10,
            "currentValue":99,"entries":[{"id":"e","date":"2026-01-02","description":"",
            "value":4,"timestamp":1}]}]}"#;
        let data: AppData = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(data.drift().len(), 1);

        let mut store = GoalStore::new(data);
        assert!((store.goal("g").expect("goal").current_value() - 4.0).abs() < f64::EPSILON);

        store.add_entry("g", day(1, 3), 1.0, "").expect("add");
        let goal = store.goal("g").expect("goal");
        assert!((goal.current_value() - 5.0).abs() < f64::EPSILON);
        assert!(store.data().drift().is_empty());
    }

    #[test]
    fn timestamps_continue_after_loaded_entries() {
        let (mut store, id) = store_with_goal(Category::Book, 0.0);
        store.add_entry(&id, day(1, 1), 1.0, "").expect("add");
        let data = store.into_data();
        let future = data.goals[0].entries()[0].timestamp + 1_000_000_000;

        let mut data = data;
        data.goals[0].entries[0].timestamp = future;
        let mut reloaded = GoalStore::new(data);
        let next = reloaded.add_entry(&id, day(1, 2), 1.0, "").expect("add");
        assert!(next.timestamp > future);
    }
}
