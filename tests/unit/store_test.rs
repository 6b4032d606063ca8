//! Tests for snapshot store backends

use chrono::NaiveDate;
use seatwatch::core::{Direction, PersistedTask, SnapshotState, SnapshotStore};
use seatwatch::infra::store::{FileSnapshotStore, InMemorySnapshotStore};

fn sample_state() -> SnapshotState {
    let mut state = SnapshotState::new();
    let tasks = state.entry("123456789".to_string()).or_default();
    tasks.insert(
        "WOODLANDS_TO_JB_2025-03-13_08:30".to_string(),
        PersistedTask {
            date: NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
            departure_time: "08:30".into(),
            direction: Direction::WoodlandsToJb,
            last_observed_seats: Some(5),
        },
    );
    tasks.insert(
        "JB_TO_WOODLANDS_2025-03-14_17:00".to_string(),
        PersistedTask {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            departure_time: "17:00".into(),
            direction: Direction::JbToWoodlands,
            last_observed_seats: None,
        },
    );
    state
}

#[test]
fn test_memory_store_round_trip() {
    let store = InMemorySnapshotStore::default();
    let state = sample_state();
    store.save(&state).unwrap();
    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("monitors.json")).unwrap();
    let state = sample_state();
    store.save(&state).unwrap();
    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn test_file_store_missing_file_is_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("monitors.json")).unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_file_store_corrupt_payload_is_codec_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitors.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileSnapshotStore::new(&path).unwrap();
    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("codec"));
}

#[test]
fn test_file_payload_uses_compact_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitors.json");
    let store = FileSnapshotStore::new(&path).unwrap();
    store.save(&sample_state()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let task = &raw["123456789"]["WOODLANDS_TO_JB_2025-03-13_08:30"];
    assert_eq!(task["time"], "08:30");
    assert_eq!(task["current_seats"], 5);
    assert_eq!(task["direction"], "WOODLANDS_TO_JB");
    assert_eq!(task["date"], "2025-03-13");
}
