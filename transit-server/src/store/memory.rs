//! In-memory store.
//!
//! Implements the same read contracts as the Postgres store over plain
//! vectors. Used by the test suite and for poking at the server without a
//! database; it is loaded up front and never mutated afterwards.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveTime;

use crate::domain::{
    Direction, Route, RouteId, ServiceCalendar, ServiceId, Stop, StopId, StopTime, Trip, TripId,
};

use super::{StoreError, TransitStore};

/// Store holding the whole dataset in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    trips: Vec<Trip>,
    calendars: HashMap<ServiceId, ServiceCalendar>,
    stop_times: Vec<StopTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stop(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    pub fn insert_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn insert_trip(&mut self, trip: Trip) {
        self.trips.push(trip);
    }

    pub fn insert_calendar(&mut self, calendar: ServiceCalendar) {
        self.calendars.insert(calendar.service_id.clone(), calendar);
    }

    pub fn insert_stop_time(&mut self, stop_time: StopTime) {
        self.stop_times.push(stop_time);
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl TransitStore for MemoryStore {
    async fn all_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.stops.clone())
    }

    async fn stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError> {
        Ok(self.stops.iter().find(|s| &s.stop_id == id).cloned())
    }

    async fn search_stops(&self, needle: &str) -> Result<Vec<Stop>, StoreError> {
        Ok(self
            .stops
            .iter()
            .filter(|s| {
                s.stop_name
                    .as_deref()
                    .is_some_and(|name| contains_ci(name, needle))
            })
            .cloned()
            .collect())
    }

    async fn route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        Ok(self.routes.iter().find(|r| &r.route_id == id).cloned())
    }

    async fn search_routes(&self, needle: &str) -> Result<Vec<Route>, StoreError> {
        let mut matches: Vec<Route> = self
            .routes
            .iter()
            .filter(|r| {
                let short = r.route_short_name.as_deref();
                let long = r.route_long_name.as_deref();
                short.is_some_and(|name| contains_ci(name, needle))
                    || long.is_some_and(|name| contains_ci(name, needle))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.route_id.cmp(&b.route_id));
        Ok(matches)
    }

    async fn trip(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips.iter().find(|t| &t.trip_id == id).cloned())
    }

    async fn trips_for_route(
        &self,
        route: &RouteId,
        direction: Option<Direction>,
    ) -> Result<Vec<Trip>, StoreError> {
        let mut trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| &t.route_id == route)
            .filter(|t| direction.is_none_or(|wanted| t.direction == Some(wanted)))
            .cloned()
            .collect();
        trips.sort_by(|a, b| a.trip_id.cmp(&b.trip_id));
        Ok(trips)
    }

    async fn calendar(&self, service: &ServiceId) -> Result<Option<ServiceCalendar>, StoreError> {
        Ok(self.calendars.get(service).cloned())
    }

    async fn stop_times_for_trip(&self, trip: &TripId) -> Result<Vec<StopTime>, StoreError> {
        let mut rows: Vec<StopTime> = self
            .stop_times
            .iter()
            .filter(|st| &st.trip_id == trip)
            .cloned()
            .collect();
        rows.sort_by_key(|st| st.stop_sequence);
        Ok(rows)
    }

    async fn departures_at_stop(
        &self,
        stop: &StopId,
        after: NaiveTime,
    ) -> Result<Vec<StopTime>, StoreError> {
        let mut rows: Vec<StopTime> = self
            .stop_times
            .iter()
            .filter(|st| &st.stop_id == stop)
            .filter(|st| st.departure_time.is_some_and(|dep| dep >= after))
            .cloned()
            .collect();
        rows.sort_by_key(|st| st.departure_time);
        Ok(rows)
    }
}
