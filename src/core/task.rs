//! Monitor task identity and descriptors.
//!
//! A monitor task is identified by its owner plus a deterministic key built
//! from the route direction, travel date, and departure time. The key doubles
//! as the deduplication handle and the target for selective cancellation.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identity of the requester a task runs on behalf of (e.g., a chat id).
///
/// Quota enforcement and status visibility are scoped per owner; one owner
/// may hold multiple tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(i64);

impl Owner {
    /// Wrap a raw owner identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Owner {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Closed set of supported shuttle routes.
///
/// The direction selects which upstream endpoint and request parameters the
/// fetcher uses; the core only treats it as an opaque route identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Woodlands CIQ → JB Sentral.
    WoodlandsToJb,
    /// JB Sentral → Woodlands CIQ.
    JbToWoodlands,
    /// JB Sentral → Segamat.
    JbToSegamat,
    /// Segamat → JB Sentral.
    SegamatToJb,
}

impl Direction {
    /// Stable identifier used in task keys and the persisted snapshot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WoodlandsToJb => "WOODLANDS_TO_JB",
            Self::JbToWoodlands => "JB_TO_WOODLANDS",
            Self::JbToSegamat => "JB_TO_SEGAMAT",
            Self::SegamatToJb => "SEGAMAT_TO_JB",
        }
    }

    /// Human-readable route text for status rows and notifications.
    #[must_use]
    pub const fn route_text(self) -> &'static str {
        match self {
            Self::WoodlandsToJb => "WOODLANDS CIQ to JB SENTRAL",
            Self::JbToWoodlands => "JB SENTRAL to WOODLANDS CIQ",
            Self::JbToSegamat => "JB SENTRAL to SEGAMAT",
            Self::SegamatToJb => "SEGAMAT to JB SENTRAL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic identity of one monitor task within an owner's set.
///
/// Format: `DIRECTION_date_time`, e.g. `WOODLANDS_TO_JB_2025-03-13_08:30`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    /// Compose a key from its parts.
    #[must_use]
    pub fn compose(direction: Direction, date: NaiveDate, departure_time: &str) -> Self {
        Self(format!("{direction}_{date}_{departure_time}"))
    }

    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable descriptor of a monitor task.
///
/// The departure time stays the provider's `HH:MM` string: it is a
/// row-matching token, not a value the core does arithmetic on. It is parsed
/// only for the expiry decision, and a string that does not parse is treated
/// as never expiring, so a provider quirk cannot kill a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Route the task watches.
    pub direction: Direction,
    /// Travel date; immutable after creation.
    pub date: NaiveDate,
    /// Departure time-of-day string identifying the tracked listing row.
    pub departure_time: String,
    /// Most recent seat count seen; absent until the first successful fetch.
    pub last_observed_seats: Option<u32>,
}

impl TaskSpec {
    /// Fresh descriptor with no observed baseline.
    #[must_use]
    pub fn new(direction: Direction, date: NaiveDate, departure_time: impl Into<String>) -> Self {
        Self {
            direction,
            date,
            departure_time: departure_time.into(),
            last_observed_seats: None,
        }
    }

    /// Descriptor restored from a snapshot, carrying the persisted baseline.
    #[must_use]
    pub fn with_baseline(mut self, last_observed_seats: Option<u32>) -> Self {
        self.last_observed_seats = last_observed_seats;
        self
    }

    /// Deterministic key for this descriptor.
    #[must_use]
    pub fn key(&self) -> TaskKey {
        TaskKey::compose(self.direction, self.date, &self.departure_time)
    }

    /// The departure instant, if the time string parses as `HH:MM`.
    #[must_use]
    pub fn departure_instant(&self) -> Option<NaiveDateTime> {
        NaiveTime::parse_from_str(&self.departure_time, "%H:%M")
            .ok()
            .map(|t| self.date.and_time(t))
    }

    /// Whether the travel date and departure time are in the past at `now`.
    ///
    /// An unparseable departure time is reported as not expired.
    #[must_use]
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.departure_instant().is_some_and(|dt| dt < now)
    }
}

/// Read-only view of an active task for status listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task key.
    pub key: TaskKey,
    /// Route the task watches.
    pub direction: Direction,
    /// Travel date.
    pub date: NaiveDate,
    /// Departure time string.
    pub departure_time: String,
    /// Latest observed seat count, if any fetch has succeeded yet.
    pub last_observed_seats: Option<u32>,
}
