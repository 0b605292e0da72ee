//! Trip records and the direction flag.

use super::ids::{RouteId, ServiceId, TripId};

/// Direction of travel along a route (GTFS `direction_id`).
///
/// The source data stores this as a 0/1 flag; keeping it as a two-value
/// enum means direction filters can never be built from arbitrary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Decode the 0/1 source flag. Any other value is not a direction.
    pub fn from_flag(flag: i16) -> Option<Self> {
        match flag {
            0 => Some(Direction::Outbound),
            1 => Some(Direction::Inbound),
            _ => None,
        }
    }

    /// The 0/1 flag used in the source data.
    pub fn flag(self) -> i16 {
        match self {
            Direction::Outbound => 0,
            Direction::Inbound => 1,
        }
    }
}

/// A trip from the static dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    /// Absent when the source row has no direction flag.
    pub direction: Option<Direction>,
}
