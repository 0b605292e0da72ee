//! Departure board construction.
//!
//! A departure board is the next N scheduled departures at one stop from a
//! reference instant, restricted to trips whose service calendar is active
//! on the reference date.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{StopId, TripId};
use crate::store::{StoreError, TransitStore};

/// Errors from board construction.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A retained row's trip references a route that does not exist.
    #[error("trip {0} references a route that does not exist")]
    RouteMissing(TripId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One row of a departure board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry {
    pub trip_id: TripId,
    pub arrival_time: Option<NaiveTime>,
    pub departure_time: NaiveTime,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<i16>,
    pub drop_off_type: Option<i16>,
    pub timepoint: Option<i16>,
    pub route_short_name: Option<String>,
}

/// Builds departure boards for single stops.
pub struct DepartureBoardBuilder {
    store: Arc<dyn TransitStore>,
}

impl DepartureBoardBuilder {
    pub fn new(store: Arc<dyn TransitStore>) -> Self {
        Self { store }
    }

    /// The next `limit` departures at `stop_id` on `date`, departing at or
    /// after `after`, sorted ascending by departure time.
    ///
    /// Rows whose trip or calendar row is absent are disqualified rather
    /// than treated as failures; a retained row whose route row is absent
    /// is a data inconsistency and aborts the board. An empty board is an
    /// ordinary result, not an error.
    pub async fn board(
        &self,
        stop_id: &StopId,
        date: NaiveDate,
        after: NaiveTime,
        limit: usize,
    ) -> Result<Vec<BoardEntry>, BoardError> {
        let rows = self.store.departures_at_stop(stop_id, after).await?;

        let mut entries = Vec::new();
        for row in rows {
            if entries.len() == limit {
                break;
            }
            // The store only returns rows with a departure time.
            let Some(departure_time) = row.departure_time else {
                continue;
            };
            let Some(trip) = self.store.trip(&row.trip_id).await? else {
                continue;
            };
            let Some(calendar) = self.store.calendar(&trip.service_id).await? else {
                continue;
            };
            if !calendar.is_active_on(date) {
                continue;
            }
            let route = self
                .store
                .route(&trip.route_id)
                .await?
                .ok_or_else(|| BoardError::RouteMissing(trip.trip_id.clone()))?;

            entries.push(BoardEntry {
                trip_id: row.trip_id,
                arrival_time: row.arrival_time,
                departure_time,
                stop_sequence: row.stop_sequence,
                stop_headsign: row.stop_headsign,
                pickup_type: row.pickup_type,
                drop_off_type: row.drop_off_type,
                timepoint: row.timepoint,
                route_short_name: route.route_short_name,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Direction, Route, RouteId, ServiceCalendar, ServiceId, Stop, StopTime, Trip, Weekday,
    };
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// A Wednesday within every fixture calendar's window.
    fn reference_date() -> NaiveDate {
        date(2025, 6, 11)
    }

    fn all_days_calendar(service: &str) -> ServiceCalendar {
        let mut cal =
            ServiceCalendar::new(ServiceId::new(service), date(2025, 1, 1), date(2025, 12, 31));
        for day in Weekday::ALL {
            cal = cal.with_day(day);
        }
        cal
    }

    fn route_with_name(id: &str, short_name: &str) -> Route {
        let mut route = Route::new(RouteId::new(id));
        route.route_short_name = Some(short_name.to_string());
        route
    }

    fn trip(id: &str, route: &str, service: &str) -> Trip {
        Trip {
            trip_id: TripId::new(id),
            route_id: RouteId::new(route),
            service_id: ServiceId::new(service),
            direction: Some(Direction::Outbound),
        }
    }

    fn departure(trip: &str, stop: &str, seq: u32, at: NaiveTime) -> StopTime {
        let mut st = StopTime::new(TripId::new(trip), StopId::new(stop), seq);
        st.departure_time = Some(at);
        st.arrival_time = Some(at);
        st
    }

    fn fixture_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_stop(Stop::new(StopId::new("s1")));
        store.insert_route(route_with_name("r1", "46A"));
        store.insert_calendar(all_days_calendar("daily"));
        for (trip_id, hour) in [("t1", 9), ("t2", 10), ("t3", 11), ("t4", 12)] {
            store.insert_trip(trip(trip_id, "r1", "daily"));
            store.insert_stop_time(departure(trip_id, "s1", 1, time(hour, 0)));
        }
        store
    }

    #[tokio::test]
    async fn board_sorted_and_filtered_by_reference_time() {
        let builder = DepartureBoardBuilder::new(Arc::new(fixture_store()));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(9, 30), 8)
            .await
            .unwrap();

        let trips: Vec<&str> = board.iter().map(|e| e.trip_id.as_str()).collect();
        assert_eq!(trips, vec!["t2", "t3", "t4"]);
        for entry in &board {
            assert!(entry.departure_time >= time(9, 30));
            assert_eq!(entry.route_short_name.as_deref(), Some("46A"));
        }
        for pair in board.windows(2) {
            assert!(pair[0].departure_time <= pair[1].departure_time);
        }
    }

    #[tokio::test]
    async fn board_respects_limit() {
        let builder = DepartureBoardBuilder::new(Arc::new(fixture_store()));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(0, 0), 2)
            .await
            .unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].trip_id.as_str(), "t1");
    }

    #[tokio::test]
    async fn inactive_calendar_rows_excluded() {
        let mut store = fixture_store();
        // A trip whose service only runs on Saturdays
        let saturday_only = ServiceCalendar::new(
            ServiceId::new("sat"),
            date(2025, 1, 1),
            date(2025, 12, 31),
        )
        .with_day(Weekday::Saturday);
        store.insert_calendar(saturday_only);
        store.insert_trip(trip("weekend", "r1", "sat"));
        store.insert_stop_time(departure("weekend", "s1", 1, time(9, 15)));

        let builder = DepartureBoardBuilder::new(Arc::new(store));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(0, 0), 8)
            .await
            .unwrap();
        assert!(board.iter().all(|e| e.trip_id.as_str() != "weekend"));
    }

    #[tokio::test]
    async fn expired_window_rows_excluded() {
        let mut store = fixture_store();
        let mut expired =
            ServiceCalendar::new(ServiceId::new("old"), date(2024, 1, 1), date(2024, 12, 31));
        for day in Weekday::ALL {
            expired = expired.with_day(day);
        }
        store.insert_calendar(expired);
        store.insert_trip(trip("lastyear", "r1", "old"));
        store.insert_stop_time(departure("lastyear", "s1", 1, time(9, 15)));

        let builder = DepartureBoardBuilder::new(Arc::new(store));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(0, 0), 8)
            .await
            .unwrap();
        assert!(board.iter().all(|e| e.trip_id.as_str() != "lastyear"));
    }

    #[tokio::test]
    async fn empty_board_is_ok() {
        let builder = DepartureBoardBuilder::new(Arc::new(fixture_store()));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(23, 0), 8)
            .await
            .unwrap();
        assert!(board.is_empty());

        let board = builder
            .board(&StopId::new("nowhere"), reference_date(), time(0, 0), 8)
            .await
            .unwrap();
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn dangling_trip_rows_skipped() {
        let mut store = fixture_store();
        // Stop-time whose trip row is gone: disqualified, not an error
        store.insert_stop_time(departure("ghost", "s1", 1, time(9, 5)));

        let builder = DepartureBoardBuilder::new(Arc::new(store));
        let board = builder
            .board(&StopId::new("s1"), reference_date(), time(9, 0), 8)
            .await
            .unwrap();
        assert!(board.iter().all(|e| e.trip_id.as_str() != "ghost"));
    }

    #[tokio::test]
    async fn dangling_route_reference_is_an_error() {
        let mut store = fixture_store();
        store.insert_trip(trip("orphan", "missing-route", "daily"));
        store.insert_stop_time(departure("orphan", "s1", 1, time(9, 5)));

        let builder = DepartureBoardBuilder::new(Arc::new(store));
        let result = builder
            .board(&StopId::new("s1"), reference_date(), time(9, 0), 8)
            .await;
        assert!(matches!(result, Err(BoardError::RouteMissing(_))));
    }
}
