//! Availability fetching abstraction and listing model.
//!
//! The fetcher is the seam between the lifecycle core and the upstream
//! provider. Implementations own the HTTP/scraping details; the core only
//! sees an ordered listing of departure rows and picks the one a task
//! tracks.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::FetchError;
use crate::core::task::Direction;

/// One departure row of a fetched trip listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRow {
    /// Train/service identifier.
    pub train: String,
    /// Departure time string as published by the provider.
    pub departure: String,
    /// Arrival time string.
    pub arrival: String,
    /// Seats currently available on this departure.
    pub seats: u32,
    /// Fare text as published by the provider.
    pub fare: String,
}

/// An ordered sequence of departure rows for one (date, direction) query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    rows: Vec<TripRow>,
}

impl Listing {
    /// Build a listing, sorting rows by departure time.
    #[must_use]
    pub fn new(mut rows: Vec<TripRow>) -> Self {
        rows.sort_by(|a, b| a.departure.cmp(&b.departure));
        Self { rows }
    }

    /// Rows in departure order.
    #[must_use]
    pub fn rows(&self) -> &[TripRow] {
        &self.rows
    }

    /// Seat count for the row matching `departure_time`.
    ///
    /// A listing without a matching row means the departure is not on sale,
    /// which reads as zero seats rather than an error.
    #[must_use]
    pub fn seats_at(&self, departure_time: &str) -> u32 {
        self.rows
            .iter()
            .find(|row| row.departure == departure_time)
            .map_or(0, |row| row.seats)
    }
}

/// Abstraction over the upstream availability data source.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use seatwatch::core::{AvailabilityFetcher, Direction, FetchError, Listing};
///
/// #[derive(Clone)]
/// struct KtmbFetcher { client: reqwest::Client }
///
/// #[async_trait]
/// impl AvailabilityFetcher for KtmbFetcher {
///     async fn fetch(
///         &self,
///         date: chrono::NaiveDate,
///         direction: Direction,
///     ) -> Result<Listing, FetchError> {
///         // POST the provider's trip endpoint, parse the HTML rows...
///         # unimplemented!()
///     }
/// }
/// ```
#[async_trait]
pub trait AvailabilityFetcher: Send + Sync + 'static {
    /// Fetch the current trip listing for a travel date and direction.
    async fn fetch(&self, date: NaiveDate, direction: Direction) -> Result<Listing, FetchError>;
}
