//! Monitor service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::worker::AlertMode;

/// Snapshot store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing; state dies with the process.
    InMemory,
    /// JSON file store.
    File {
        /// Path of the snapshot file.
        path: String,
    },
}

/// Root configuration for the monitor service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fixed polling period per task, in seconds.
    pub poll_interval_secs: u64,
    /// Periodic snapshot interval, in seconds; independent of polling.
    pub snapshot_interval_secs: u64,
    /// Upper bound on a single fetch call, in seconds.
    pub fetch_timeout_secs: u64,
    /// Per-owner concurrent task ceiling.
    pub max_tasks_per_owner: usize,
    /// Seats-found rule.
    #[serde(default)]
    pub alert_mode: AlertMode,
    /// Snapshot store backend.
    pub store: StoreBackendConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            snapshot_interval_secs: 60,
            fetch_timeout_secs: 30,
            max_tasks_per_owner: 5,
            alert_mode: AlertMode::SeatIncrease,
            store: StoreBackendConfig::File {
                path: "active_monitors.json".into(),
            },
        }
    }
}

impl MonitorConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".into());
        }
        if self.snapshot_interval_secs == 0 {
            return Err("snapshot_interval_secs must be greater than 0".into());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".into());
        }
        if self.max_tasks_per_owner == 0 {
            return Err("max_tasks_per_owner must be greater than 0".into());
        }
        if let StoreBackendConfig::File { path } = &self.store {
            if path.is_empty() {
                return Err("store file path must not be empty".into());
            }
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// A parse or validation error description.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment, with `.env` support.
    ///
    /// Recognized variables, all optional on top of [`MonitorConfig::default`]:
    /// `SEATWATCH_POLL_INTERVAL_SECS`, `SEATWATCH_SNAPSHOT_INTERVAL_SECS`,
    /// `SEATWATCH_FETCH_TIMEOUT_SECS`, `SEATWATCH_MAX_TASKS_PER_OWNER`,
    /// `SEATWATCH_ALERT_MODE` (`seat_increase` | `first_availability`),
    /// `SEATWATCH_STATE_FILE`.
    ///
    /// # Errors
    ///
    /// A description of the first unparseable variable, or a validation
    /// error.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SEATWATCH_POLL_INTERVAL_SECS") {
            cfg.poll_interval_secs = parse_var("SEATWATCH_POLL_INTERVAL_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("SEATWATCH_SNAPSHOT_INTERVAL_SECS") {
            cfg.snapshot_interval_secs = parse_var("SEATWATCH_SNAPSHOT_INTERVAL_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("SEATWATCH_FETCH_TIMEOUT_SECS") {
            cfg.fetch_timeout_secs = parse_var("SEATWATCH_FETCH_TIMEOUT_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("SEATWATCH_MAX_TASKS_PER_OWNER") {
            cfg.max_tasks_per_owner = parse_var("SEATWATCH_MAX_TASKS_PER_OWNER", &v)?;
        }
        if let Ok(v) = std::env::var("SEATWATCH_ALERT_MODE") {
            cfg.alert_mode = match v.as_str() {
                "seat_increase" => AlertMode::SeatIncrease,
                "first_availability" => AlertMode::FirstAvailability,
                other => return Err(format!("SEATWATCH_ALERT_MODE unrecognized: {other}")),
            };
        }
        if let Ok(path) = std::env::var("SEATWATCH_STATE_FILE") {
            cfg.store = StoreBackendConfig::File { path };
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Polling period as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Snapshot interval as a [`Duration`].
    #[must_use]
    pub const fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs)
    }

    /// Fetch timeout as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{name} must be a number, got `{value}`"))
}
