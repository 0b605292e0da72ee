//! Data transfer objects for web requests and responses.
//!
//! Field names follow the snake_case GTFS column names; times serialize
//! as `HH:MM:SS`, dates as `YYYY-MM-DD`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::board::BoardEntry;
use crate::locator::RankedStop;
use crate::timetable::{DaySchedule, TimetableEntry, WeeklyTimetable};

/// Query parameters for the nearest-stops endpoint.
///
/// Both fields are required; they are `Option` so the handler can report
/// their absence itself rather than let the extractor reject the request.
#[derive(Debug, Deserialize)]
pub struct NearestStopsParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Query parameters for stop search.
#[derive(Debug, Deserialize)]
pub struct StopSearchParams {
    pub query: Option<String>,
}

/// Query parameters for the route timetable.
#[derive(Debug, Deserialize)]
pub struct TimetableParams {
    pub route_id: Option<String>,
}

/// Query parameters for route search.
#[derive(Debug, Deserialize)]
pub struct RouteSearchParams {
    pub search_query: Option<String>,
}

/// One departure-board row.
#[derive(Debug, Serialize)]
pub struct DepartureDto {
    pub trip_id: String,
    pub arrival_time: Option<String>,
    pub departure_time: String,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<i16>,
    pub drop_off_type: Option<i16>,
    pub timepoint: Option<i16>,
    pub route_short_name: Option<String>,
}

impl DepartureDto {
    pub fn from_entry(entry: &BoardEntry) -> Self {
        Self {
            trip_id: entry.trip_id.to_string(),
            arrival_time: entry.arrival_time.map(format_time),
            departure_time: format_time(entry.departure_time),
            stop_sequence: entry.stop_sequence,
            stop_headsign: entry.stop_headsign.clone(),
            pickup_type: entry.pickup_type,
            drop_off_type: entry.drop_off_type,
            timepoint: entry.timepoint,
            route_short_name: entry.route_short_name.clone(),
        }
    }
}

/// A nearest-stops result row.
#[derive(Debug, Serialize)]
pub struct NearestStopDto {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Whole metres, truncated.
    pub distance: i64,
    pub trips: Vec<DepartureDto>,
}

impl NearestStopDto {
    pub fn from_ranked(ranked: &RankedStop, board: &[BoardEntry]) -> Self {
        Self {
            stop_id: ranked.stop.stop_id.to_string(),
            stop_name: ranked.stop.stop_name.clone(),
            latitude: ranked.stop.stop_lat,
            longitude: ranked.stop.stop_lon,
            distance: ranked.distance_m,
            trips: board.iter().map(DepartureDto::from_entry).collect(),
        }
    }
}

/// A stop-search result row.
#[derive(Debug, Serialize)]
pub struct StopSearchResultDto {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub trips: Vec<DepartureDto>,
}

impl StopSearchResultDto {
    pub fn from_stop(stop: &crate::domain::Stop, board: &[BoardEntry]) -> Self {
        Self {
            stop_id: stop.stop_id.to_string(),
            stop_name: stop.stop_name.clone(),
            trips: board.iter().map(DepartureDto::from_entry).collect(),
        }
    }
}

/// A route-search result row.
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
}

impl RouteDto {
    pub fn from_route(route: &crate::domain::Route) -> Self {
        Self {
            route_id: route.route_id.to_string(),
            route_short_name: route.route_short_name.clone(),
            route_long_name: route.route_long_name.clone(),
        }
    }
}

/// Response for route search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub routes: Vec<RouteDto>,
}

/// One trip in a weekday bucket.
#[derive(Debug, Serialize)]
pub struct TimetableTripDto {
    pub trip_id: String,
    pub arrival_times: Vec<String>,
    pub stop_names: Vec<String>,
    pub start_date: String,
    pub end_date: String,
}

impl TimetableTripDto {
    pub fn from_entry(entry: &TimetableEntry) -> Self {
        Self {
            trip_id: entry.trip_id.to_string(),
            arrival_times: entry.arrival_times.iter().copied().map(format_time).collect(),
            stop_names: entry.stop_names.clone(),
            start_date: format_date(entry.start_date),
            end_date: format_date(entry.end_date),
        }
    }
}

/// One weekday bucket.
#[derive(Debug, Serialize)]
pub struct DayTimetableDto {
    pub day: &'static str,
    pub trips: Vec<TimetableTripDto>,
}

impl DayTimetableDto {
    pub fn from_schedule(schedule: &DaySchedule) -> Self {
        Self {
            day: schedule.day.name(),
            trips: schedule
                .trips
                .iter()
                .map(TimetableTripDto::from_entry)
                .collect(),
        }
    }
}

/// Response for the route timetable.
#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub timetables: Vec<DayTimetableDto>,
}

impl TimetableResponse {
    pub fn from_timetable(timetable: &WeeklyTimetable) -> Self {
        Self {
            route_id: timetable.route_id.to_string(),
            route_short_name: timetable.route_short_name.clone(),
            timetables: timetable
                .days
                .iter()
                .map(DayTimetableDto::from_schedule)
                .collect(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Format a time-of-day as `HH:MM:SS`.
fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Format a date as `YYYY-MM-DD`.
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
