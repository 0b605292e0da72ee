//! Stop-time records.

use chrono::NaiveTime;

use super::ids::{StopId, TripId};

/// One scheduled stop visit within a trip.
///
/// `stop_sequence` orders visits within the trip and matches the physical
/// stop order; any derived per-trip listing must preserve it.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_time: Option<NaiveTime>,
    pub departure_time: Option<NaiveTime>,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<i16>,
    pub drop_off_type: Option<i16>,
    pub timepoint: Option<i16>,
}

impl StopTime {
    /// A stop-time with only the structural fields set.
    pub fn new(trip_id: TripId, stop_id: StopId, stop_sequence: u32) -> Self {
        Self {
            trip_id,
            stop_id,
            stop_sequence,
            arrival_time: None,
            departure_time: None,
            stop_headsign: None,
            pickup_type: None,
            drop_off_type: None,
            timepoint: None,
        }
    }
}
