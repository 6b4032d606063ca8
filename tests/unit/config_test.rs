//! Tests for configuration parsing and validation

use std::time::Duration;

use seatwatch::config::{MonitorConfig, StoreBackendConfig};
use seatwatch::core::AlertMode;

#[test]
fn test_defaults() {
    let cfg = MonitorConfig::default();
    assert_eq!(cfg.poll_interval(), Duration::from_secs(60));
    assert_eq!(cfg.snapshot_interval(), Duration::from_secs(60));
    assert_eq!(cfg.fetch_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.max_tasks_per_owner, 5);
    assert_eq!(cfg.alert_mode, AlertMode::SeatIncrease);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_json_round_trip_preserves_config() {
    let cfg = MonitorConfig {
        poll_interval_secs: 15,
        store: StoreBackendConfig::InMemory,
        ..MonitorConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(MonitorConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_alert_mode_defaults_when_absent() {
    let cfg = MonitorConfig::from_json_str(
        r#"{
            "poll_interval_secs": 60,
            "snapshot_interval_secs": 60,
            "fetch_timeout_secs": 30,
            "max_tasks_per_owner": 5,
            "store": "in_memory"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.alert_mode, AlertMode::SeatIncrease);
}

#[test]
fn test_malformed_json_reports_parse_error() {
    let err = MonitorConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.contains("parse error"));
}

#[test]
fn test_invalid_values_rejected_on_parse() {
    let err = MonitorConfig::from_json_str(
        r#"{
            "poll_interval_secs": 0,
            "snapshot_interval_secs": 60,
            "fetch_timeout_secs": 30,
            "max_tasks_per_owner": 5,
            "store": "in_memory"
        }"#,
    )
    .unwrap_err();
    assert!(err.contains("poll_interval_secs"));
}
