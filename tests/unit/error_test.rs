//! Tests for error display formatting

use chrono::NaiveDate;
use seatwatch::core::{Direction, FetchError, StartError, StopError, TaskKey};

fn key() -> TaskKey {
    TaskKey::compose(
        Direction::WoodlandsToJb,
        NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
        "08:30",
    )
}

#[test]
fn test_duplicate_key_display() {
    let err = StartError::DuplicateKey(key());
    assert_eq!(
        err.to_string(),
        "already monitoring WOODLANDS_TO_JB_2025-03-13_08:30"
    );
}

#[test]
fn test_quota_display_names_ceiling() {
    let err = StartError::OwnerQuotaExceeded(5);
    assert!(err.to_string().contains("at most 5"));
}

#[test]
fn test_past_departure_display() {
    assert_eq!(
        StartError::PastDeparture.to_string(),
        "cannot monitor a past departure time"
    );
}

#[test]
fn test_not_found_display() {
    let err = StopError::NotFound(key());
    assert!(err.to_string().contains("WOODLANDS_TO_JB_2025-03-13_08:30"));
}

#[test]
fn test_fetch_error_display() {
    assert_eq!(FetchError::Timeout.to_string(), "fetch timed out");
    assert_eq!(
        FetchError::Upstream("503".into()).to_string(),
        "fetch failed: 503"
    );
}
