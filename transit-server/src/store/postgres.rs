//! Postgres-backed store.
//!
//! Expects the relational dataset produced by the external GTFS loader:
//!
//! - `stops(stop_id, stop_code, stop_name, stop_desc, stop_lat, stop_lon,
//!   zone_id, stop_url, location_type, parent_station)`
//! - `routes(route_id, route_short_name, route_long_name)`
//! - `trips(trip_id, route_id, service_id, direction_id)`
//! - `calendar(service_id, monday … sunday smallint 0/1,
//!   start_date date, end_date date)`
//! - `stop_times(trip_id, arrival_time time, departure_time time, stop_id,
//!   stop_sequence, stop_headsign, pickup_type, drop_off_type, timepoint)`
//!
//! All queries are plain reads; this module never builds SQL from
//! externally influenced text (needle parameters are bound, never spliced).

use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::domain::{
    Direction, Route, RouteId, ServiceCalendar, ServiceId, Stop, StopId, StopTime, Trip, TripId,
};

use super::{StoreError, TransitStore};

const STOP_COLUMNS: &str = "stop_id, stop_code, stop_name, stop_desc, stop_lat, stop_lon, \
     zone_id, stop_url, location_type, parent_station";

const STOP_TIME_COLUMNS: &str = "trip_id, stop_id, stop_sequence, arrival_time, departure_time, \
     stop_headsign, pickup_type, drop_off_type, timepoint";

/// Store backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransitStore for PgStore {
    async fn all_stops(&self) -> Result<Vec<Stop>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {STOP_COLUMNS} FROM stops"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(stop_from_row).collect()
    }

    async fn stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {STOP_COLUMNS} FROM stops WHERE stop_id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(stop_from_row).transpose()
    }

    async fn search_stops(&self, needle: &str) -> Result<Vec<Stop>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {STOP_COLUMNS} FROM stops WHERE stop_name ILIKE $1"
        ))
        .bind(format!("%{needle}%"))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(stop_from_row).collect()
    }

    async fn route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        let row = sqlx::query(
            "SELECT route_id, route_short_name, route_long_name FROM routes WHERE route_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(route_from_row).transpose()
    }

    async fn search_routes(&self, needle: &str) -> Result<Vec<Route>, StoreError> {
        let rows = sqlx::query(
            "SELECT route_id, route_short_name, route_long_name FROM routes \
             WHERE route_short_name ILIKE $1 OR route_long_name ILIKE $1 \
             ORDER BY route_id",
        )
        .bind(format!("%{needle}%"))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(route_from_row).collect()
    }

    async fn trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        let row = sqlx::query(
            "SELECT trip_id, route_id, service_id, direction_id FROM trips WHERE trip_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(trip_from_row).transpose()
    }

    async fn trips_for_route(
        &self,
        route: &RouteId,
        direction: Option<Direction>,
    ) -> Result<Vec<Trip>, StoreError> {
        let rows = match direction {
            Some(direction) => {
                sqlx::query(
                    "SELECT trip_id, route_id, service_id, direction_id FROM trips \
                     WHERE route_id = $1 AND direction_id = $2 \
                     ORDER BY trip_id",
                )
                .bind(route.as_str())
                .bind(direction.flag())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT trip_id, route_id, service_id, direction_id FROM trips \
                     WHERE route_id = $1 \
                     ORDER BY trip_id",
                )
                .bind(route.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(trip_from_row).collect()
    }

    async fn calendar(&self, service: &ServiceId) -> Result<Option<ServiceCalendar>, StoreError> {
        let row = sqlx::query(
            "SELECT service_id, monday, tuesday, wednesday, thursday, friday, saturday, sunday, \
             start_date, end_date FROM calendar WHERE service_id = $1",
        )
        .bind(service.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(calendar_from_row).transpose()
    }

    async fn stop_times_for_trip(&self, trip: &TripId) -> Result<Vec<StopTime>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {STOP_TIME_COLUMNS} FROM stop_times WHERE trip_id = $1 \
             ORDER BY stop_sequence"
        ))
        .bind(trip.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(stop_time_from_row).collect()
    }

    async fn departures_at_stop(
        &self,
        stop: &StopId,
        after: NaiveTime,
    ) -> Result<Vec<StopTime>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {STOP_TIME_COLUMNS} FROM stop_times \
             WHERE stop_id = $1 AND departure_time >= $2 \
             ORDER BY departure_time"
        ))
        .bind(stop.as_str())
        .bind(after)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(stop_time_from_row).collect()
    }
}

fn stop_from_row(row: &PgRow) -> Result<Stop, StoreError> {
    Ok(Stop {
        stop_id: StopId::new(row.try_get::<String, _>("stop_id")?),
        stop_code: row.try_get("stop_code")?,
        stop_name: row.try_get("stop_name")?,
        stop_desc: row.try_get("stop_desc")?,
        stop_lat: row.try_get("stop_lat")?,
        stop_lon: row.try_get("stop_lon")?,
        zone_id: row.try_get("zone_id")?,
        stop_url: row.try_get("stop_url")?,
        location_type: row.try_get("location_type")?,
        parent_station: row
            .try_get::<Option<String>, _>("parent_station")?
            .map(StopId::new),
    })
}

fn route_from_row(row: &PgRow) -> Result<Route, StoreError> {
    Ok(Route {
        route_id: RouteId::new(row.try_get::<String, _>("route_id")?),
        route_short_name: row.try_get("route_short_name")?,
        route_long_name: row.try_get("route_long_name")?,
    })
}

fn trip_from_row(row: &PgRow) -> Result<Trip, StoreError> {
    Ok(Trip {
        trip_id: TripId::new(row.try_get::<String, _>("trip_id")?),
        route_id: RouteId::new(row.try_get::<String, _>("route_id")?),
        service_id: ServiceId::new(row.try_get::<String, _>("service_id")?),
        direction: row
            .try_get::<Option<i16>, _>("direction_id")?
            .and_then(Direction::from_flag),
    })
}

fn calendar_from_row(row: &PgRow) -> Result<ServiceCalendar, StoreError> {
    // Weekday flags are smallint 0/1 in the loaded schema; any non-zero
    // value counts as set.
    let flag = |column: &str| -> Result<bool, sqlx::Error> {
        Ok(row.try_get::<i16, _>(column)? != 0)
    };
    Ok(ServiceCalendar {
        service_id: ServiceId::new(row.try_get::<String, _>("service_id")?),
        monday: flag("monday")?,
        tuesday: flag("tuesday")?,
        wednesday: flag("wednesday")?,
        thursday: flag("thursday")?,
        friday: flag("friday")?,
        saturday: flag("saturday")?,
        sunday: flag("sunday")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
    })
}

fn stop_time_from_row(row: &PgRow) -> Result<StopTime, StoreError> {
    Ok(StopTime {
        trip_id: TripId::new(row.try_get::<String, _>("trip_id")?),
        stop_id: StopId::new(row.try_get::<String, _>("stop_id")?),
        stop_sequence: row.try_get::<i32, _>("stop_sequence")? as u32,
        arrival_time: row.try_get("arrival_time")?,
        departure_time: row.try_get("departure_time")?,
        stop_headsign: row.try_get("stop_headsign")?,
        pickup_type: row.try_get("pickup_type")?,
        drop_off_type: row.try_get("drop_off_type")?,
        timepoint: row.try_get("timepoint")?,
    })
}
