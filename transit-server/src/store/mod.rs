//! Read-only access to the static transit dataset.
//!
//! Everything rider-facing is recomputed from these row-level reads on each
//! request. The trait is the seam between the aggregation logic and the
//! backing store: the production implementation queries Postgres, the
//! in-memory implementation backs tests and credential-less local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveTime;

use crate::domain::{
    Direction, Route, RouteId, ServiceCalendar, ServiceId, Stop, StopId, StopTime, Trip, TripId,
};

/// Errors from the backing store.
///
/// Store failures are terminal for the response being built: they are
/// surfaced as internal errors and never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or row-decode failure in the database layer.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row-level reads over the static dataset.
///
/// All methods are single, independent queries; callers compose them
/// sequentially per request. No method writes.
#[async_trait]
pub trait TransitStore: Send + Sync {
    /// Every stop in the dataset, in unspecified order.
    async fn all_stops(&self) -> Result<Vec<Stop>, StoreError>;

    /// A single stop by identifier.
    async fn stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError>;

    /// Stops whose name contains `needle` case-insensitively, in
    /// unspecified order. Callers impose ordering and limits.
    async fn search_stops(&self, needle: &str) -> Result<Vec<Stop>, StoreError>;

    /// A single route by identifier.
    async fn route(&self, id: &RouteId) -> Result<Option<Route>, StoreError>;

    /// Routes whose short or long name contains `needle`
    /// case-insensitively, ordered by route id.
    async fn search_routes(&self, needle: &str) -> Result<Vec<Route>, StoreError>;

    /// A single trip by identifier.
    async fn trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError>;

    /// Trips belonging to a route, optionally restricted to one direction.
    /// A direction filter excludes trips without a direction flag.
    async fn trips_for_route(
        &self,
        route: &RouteId,
        direction: Option<Direction>,
    ) -> Result<Vec<Trip>, StoreError>;

    /// The calendar for a service, if one exists.
    async fn calendar(&self, service: &ServiceId) -> Result<Option<ServiceCalendar>, StoreError>;

    /// A trip's stop-times ordered by stop sequence ascending.
    async fn stop_times_for_trip(&self, trip: &TripId) -> Result<Vec<StopTime>, StoreError>;

    /// Stop-times at a stop whose departure time is present and `>= after`,
    /// ordered by departure time ascending. Calendar filtering is the
    /// caller's job.
    async fn departures_at_stop(
        &self,
        stop: &StopId,
        after: NaiveTime,
    ) -> Result<Vec<StopTime>, StoreError>;
}
