//! Tests for the clock abstraction

use chrono::{Duration, NaiveDate};
use seatwatch::util::{Clock, FixedClock, SystemClock};

#[test]
fn test_system_clock_advances() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn test_fixed_clock_stays_pinned() {
    let t0 = NaiveDate::from_ymd_opt(2025, 3, 13)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let clock = FixedClock::new(t0);
    assert_eq!(clock.now(), t0);
    assert_eq!(clock.now(), t0);
}

#[test]
fn test_fixed_clock_clones_share_time() {
    let t0 = NaiveDate::from_ymd_opt(2025, 3, 13)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let clock = FixedClock::new(t0);
    let other = clock.clone();

    let t1 = t0 + Duration::days(1);
    clock.set(t1);
    assert_eq!(other.now(), t1);
}
