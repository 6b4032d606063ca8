//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use seatwatch::config::{MonitorConfig, StoreBackendConfig};
use seatwatch::core::{
    AvailabilityFetcher, DeliveryError, Direction, FetchError, Listing, MonitorService, Notifier,
    Owner, SnapshotStore, TripRow,
};
use seatwatch::runtime::TokioSpawner;
use seatwatch::util::{Clock, FixedClock};

/// Fetcher that plays back a scripted seat-count sequence for one departure.
///
/// Call `n` returns the `n`-th script entry; past the end the last entry
/// repeats, so a finished script reads as a stable seat count.
pub struct ScriptedFetcher {
    departure: String,
    script: Vec<u32>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(departure: &str, script: Vec<u32>) -> Self {
        Self {
            departure: departure.to_string(),
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityFetcher for ScriptedFetcher {
    async fn fetch(&self, _date: NaiveDate, _direction: Direction) -> Result<Listing, FetchError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        let seats = self
            .script
            .get(idx)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(0);
        Ok(Listing::new(vec![TripRow {
            train: "ST01".into(),
            departure: self.departure.clone(),
            arrival: "09:00".into(),
            seats,
            fare: "RM 5.00".into(),
        }]))
    }
}

/// Fetcher whose every call fails, as a provider outage would.
pub struct FailingFetcher;

#[async_trait]
impl AvailabilityFetcher for FailingFetcher {
    async fn fetch(&self, _date: NaiveDate, _direction: Direction) -> Result<Listing, FetchError> {
        Err(FetchError::Upstream("connection reset by peer".into()))
    }
}

/// Fetcher whose calls never resolve, as a stalled upstream would.
pub struct HangingFetcher;

#[async_trait]
impl AvailabilityFetcher for HangingFetcher {
    async fn fetch(&self, _date: NaiveDate, _direction: Direction) -> Result<Listing, FetchError> {
        std::future::pending().await
    }
}

/// Notifier that records every delivered message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Owner, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Owner, String)> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, owner: Owner, text: &str) -> Result<(), DeliveryError> {
        self.messages.lock().push((owner, text.to_string()));
        Ok(())
    }
}

/// Notifier whose every delivery fails, counting the attempts.
#[derive(Default)]
pub struct FailingNotifier {
    attempts: AtomicUsize,
}

impl FailingNotifier {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _owner: Owner, _text: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Transport("bot blocked by the user".into()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn instant(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Default configuration pointed at the in-memory store backend.
pub fn test_config() -> MonitorConfig {
    MonitorConfig {
        store: StoreBackendConfig::InMemory,
        ..MonitorConfig::default()
    }
}

/// Assemble a service on the current runtime from test collaborators.
pub fn build_service(
    config: &MonitorConfig,
    fetcher: Arc<dyn AvailabilityFetcher>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<FixedClock>,
) -> MonitorService<TokioSpawner> {
    let clock: Arc<dyn Clock> = clock;
    MonitorService::new(
        config,
        fetcher,
        notifier,
        store,
        clock,
        TokioSpawner::current(),
    )
}
