use std::fs;

use chrono::NaiveDate;
use gbit_core::storage::{load_document, load_document_raw, save_document};
use gbit_core::store::{GoalPatch, GoalStore, NewGoal};
use gbit_core::{AppData, Category};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

/// A document as an older build would have written it.
const LEGACY_DOCUMENT: &str = r#"{
  "goals": [
    {
      "id": "1718000000000",
      "title": "Read Rust book",
      "category": "Book",
      "targetValue": 20,
      "currentValue": 5,
      "unit": "chapters",
      "entries": [
        { "id": "1718000000001", "date": "2026-01-10", "description": "ch 1-3", "value": 3, "timestamp": 1718000000001 },
        { "id": "1718000000002", "date": "2026-02-01", "description": "ch 4-5", "value": 2, "timestamp": 1718000000002 }
      ]
    },
    {
      "id": "1718000000100",
      "title": "Meditate",
      "category": "General",
      "targetValue": 0,
      "currentValue": 0,
      "link": "https://example.com/sit",
      "entries": []
    }
  ]
}"#;

#[test]
fn legacy_document_loads_and_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("goals.json");
    fs::write(&path, LEGACY_DOCUMENT).expect("write");

    let data = load_document(&path);
    assert_eq!(data.goals.len(), 2);
    assert_eq!(data.goals[0].entries()[1].date, date("2026-02-01"));
    assert_eq!(data.goals[1].link.as_deref(), Some("https://example.com/sit"));

    save_document(&path, &data).expect("save");
    let reread: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    let original: serde_json::Value = serde_json::from_str(LEGACY_DOCUMENT).expect("json");
    assert_eq!(numbers_as_f64(reread), numbers_as_f64(original));
}

/// Integer and float JSON numbers compare unequal; the document only cares
/// about the numeric value.
fn numbers_as_f64(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Number(n), Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(numbers_as_f64).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, numbers_as_f64(v)))
                .collect(),
        ),
        other => other,
    }
}

#[test]
fn mutations_survive_a_save_and_reload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("goals.json");

    let mut store = GoalStore::new(load_document(&path));
    let id = store
        .create_goal(NewGoal::new("Save", Category::Money).target(1000.0))
        .id
        .clone();
    store.add_entry(&id, date("2026-03-01"), 250.0, "salary").expect("add");
    let refund = store.add_entry(&id, date("2026-03-02"), -50.0, "refund").expect("add");
    store.delete_entry(&id, &refund.id).expect("delete");
    store
        .update_goal(
            &id,
            GoalPatch {
                title: Some("Emergency fund".to_string()),
                ..GoalPatch::default()
            },
        )
        .expect("update");
    save_document(&path, store.data()).expect("save");

    let reloaded = GoalStore::new(load_document(&path));
    let goal = reloaded.goal(&id).expect("goal");
    assert_eq!(goal.title, "Emergency fund");
    assert_eq!(goal.unit.as_deref(), Some("INR"));
    assert_eq!(goal.entries().len(), 1);
    assert!((goal.current_value() - 250.0).abs() < f64::EPSILON);
}

#[test]
fn raw_load_keeps_drift_and_load_repairs_it() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("goals.json");
    fs::write(&path, LEGACY_DOCUMENT.replace("\"currentValue\": 5", "\"currentValue\": 9"))
        .expect("write");

    let raw = load_document_raw(&path).expect("raw");
    let drift = raw.drift();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].title, "Read Rust book");
    assert!((drift[0].computed - 5.0).abs() < f64::EPSILON);

    let repaired = load_document(&path);
    assert!(repaired.drift().is_empty());
}

#[test]
fn unreadable_document_starts_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("goals.json");
    fs::write(&path, "[1, 2, 3]").expect("write");

    assert!(load_document_raw(&path).is_err());
    assert_eq!(load_document(&path), AppData::default());
}
