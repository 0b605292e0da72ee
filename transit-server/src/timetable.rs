//! Weekly timetable assembly.
//!
//! A weekly timetable lists a route's trips grouped into seven weekday
//! buckets. Two long-standing behaviors are kept as defaults but exposed
//! as explicit policy knobs: the single-day validity gate on a whole-week
//! view, and the first-match single-weekday bucketing of multi-day
//! services.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{Direction, RouteId, TripId, Weekday};
use crate::store::{StoreError, TransitStore};

/// Policy knobs for timetable assembly.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Restrict trips to one direction. Defaults to outbound, the
    /// direction the public timetable has always shown. `None` includes
    /// both directions.
    pub direction: Option<Direction>,

    /// Skip trips whose validity window does not contain the reference
    /// date. Under this gate a future-dated service is excluded even
    /// though it would run on some weekday within its own window. Set to
    /// `false` for the corrected weekday-membership-only mode.
    pub require_window_contains_date: bool,

    /// Place each trip in every active weekday bucket instead of only the
    /// first one in monday→sunday scan order.
    pub all_weekdays: bool,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            direction: Some(Direction::Outbound),
            require_window_contains_date: true,
            all_weekdays: false,
        }
    }
}

impl TimetableConfig {
    /// Set the direction filter.
    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    /// Enable or disable the single-day validity gate.
    pub fn with_window_gate(mut self, enabled: bool) -> Self {
        self.require_window_contains_date = enabled;
        self
    }

    /// Enable or disable all-active-weekdays bucketing.
    pub fn with_all_weekdays(mut self, enabled: bool) -> Self {
        self.all_weekdays = enabled;
        self
    }
}

/// Errors from timetable assembly.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The requested route does not exist.
    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One trip's appearance in a weekday bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableEntry {
    pub trip_id: TripId,
    /// Arrival times in stop-sequence order; visits without an arrival
    /// time are omitted.
    pub arrival_times: Vec<NaiveTime>,
    /// Stop names in stop-sequence order; visits whose stop cannot be
    /// resolved to a named stop are omitted.
    pub stop_names: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TimetableEntry {
    /// Sort key: first arrival ascending, entries without any arrival
    /// after all timed entries.
    fn sort_key(&self) -> (bool, NaiveTime) {
        match self.arrival_times.first() {
            Some(first) => (false, *first),
            None => (true, NaiveTime::MIN),
        }
    }
}

/// One weekday's bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: Weekday,
    pub trips: Vec<TimetableEntry>,
}

/// A route's full week, always seven buckets in monday…sunday order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTimetable {
    pub route_id: RouteId,
    pub route_short_name: Option<String>,
    pub days: Vec<DaySchedule>,
}

/// Builds weekly timetables for single routes.
pub struct WeeklyTimetableBuilder {
    store: Arc<dyn TransitStore>,
    config: TimetableConfig,
}

impl WeeklyTimetableBuilder {
    pub fn new(store: Arc<dyn TransitStore>, config: TimetableConfig) -> Self {
        Self { store, config }
    }

    /// Assemble the weekly timetable for `route_id` as seen from
    /// `reference_date`.
    ///
    /// Trips without a calendar row, outside the window gate, or with no
    /// active weekday are skipped. Any store failure aborts the whole
    /// timetable; there is no partial composition.
    pub async fn timetable(
        &self,
        route_id: &RouteId,
        reference_date: NaiveDate,
    ) -> Result<WeeklyTimetable, TimetableError> {
        let route = self
            .store
            .route(route_id)
            .await?
            .ok_or_else(|| TimetableError::RouteNotFound(route_id.clone()))?;

        let trips = self
            .store
            .trips_for_route(route_id, self.config.direction)
            .await?;

        let mut days: Vec<DaySchedule> = Weekday::ALL
            .into_iter()
            .map(|day| DaySchedule {
                day,
                trips: Vec::new(),
            })
            .collect();

        for trip in trips {
            let Some(calendar) = self.store.calendar(&trip.service_id).await? else {
                continue;
            };
            if self.config.require_window_contains_date
                && !calendar.window_contains(reference_date)
            {
                continue;
            }
            let buckets: Vec<Weekday> = if self.config.all_weekdays {
                calendar.active_weekdays()
            } else {
                calendar.primary_weekday().into_iter().collect()
            };
            if buckets.is_empty() {
                continue;
            }

            let stop_times = self.store.stop_times_for_trip(&trip.trip_id).await?;
            let mut arrival_times = Vec::with_capacity(stop_times.len());
            let mut stop_names = Vec::with_capacity(stop_times.len());
            for stop_time in &stop_times {
                if let Some(arrival) = stop_time.arrival_time {
                    arrival_times.push(arrival);
                }
                let stop = self.store.stop(&stop_time.stop_id).await?;
                if let Some(name) = stop.and_then(|s| s.stop_name) {
                    stop_names.push(name);
                }
            }

            let entry = TimetableEntry {
                trip_id: trip.trip_id.clone(),
                arrival_times,
                stop_names,
                start_date: calendar.start_date,
                end_date: calendar.end_date,
            };
            for day in buckets {
                days[day.index()].trips.push(entry.clone());
            }
        }

        // Stable sort: equally-timeless entries keep insertion order.
        for day in &mut days {
            day.trips.sort_by_key(TimetableEntry::sort_key);
        }

        Ok(WeeklyTimetable {
            route_id: route.route_id,
            route_short_name: route.route_short_name,
            days,
        })
    }
}
