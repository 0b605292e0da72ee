//! Stop records.

use super::geo::Coordinates;
use super::ids::StopId;

/// A stop from the static dataset.
///
/// Everything except the identifier is optional in the source data, so
/// every other field is an explicit `Option` rather than an empty-string
/// sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub stop_id: StopId,
    pub stop_code: Option<String>,
    pub stop_name: Option<String>,
    pub stop_desc: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub zone_id: Option<String>,
    pub stop_url: Option<String>,
    pub location_type: Option<i16>,
    pub parent_station: Option<StopId>,
}

impl Stop {
    /// A minimal stop with only the identifier set.
    pub fn new(stop_id: StopId) -> Self {
        Self {
            stop_id,
            stop_code: None,
            stop_name: None,
            stop_desc: None,
            stop_lat: None,
            stop_lon: None,
            zone_id: None,
            stop_url: None,
            location_type: None,
            parent_station: None,
        }
    }

    /// The stop's position, if both coordinates are present and valid.
    ///
    /// Stops without a usable position cannot be ranked by distance and
    /// are skipped by the locator.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.stop_lat?;
        let lon = self.stop_lon?;
        Coordinates::new(lat, lon).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_fields() {
        let mut stop = Stop::new(StopId::new("s1"));
        assert!(stop.coordinates().is_none());

        stop.stop_lat = Some(53.35);
        assert!(stop.coordinates().is_none());

        stop.stop_lon = Some(-6.26);
        let coords = stop.coordinates().unwrap();
        assert_eq!(coords.latitude(), 53.35);
        assert_eq!(coords.longitude(), -6.26);
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        let mut stop = Stop::new(StopId::new("s1"));
        stop.stop_lat = Some(f64::NAN);
        stop.stop_lon = Some(-6.26);
        assert!(stop.coordinates().is_none());
    }
}
