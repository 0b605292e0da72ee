//! Geospatial distance math.
//!
//! Distances are great-circle distances on a sphere of radius 6 371 000 m,
//! computed with the spherical law of cosines:
//!
//! `d = R·acos(cos φ1·cos φ2·cos(λ2−λ1) + sin φ1·sin φ2)`
//!
//! The cosine argument is clamped to [-1, 1] so floating-point noise at
//! identical or antipodal points cannot produce NaN.

use std::fmt;

/// Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when a coordinate pair is not usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

impl InvalidCoordinates {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A latitude/longitude pair in degrees.
///
/// Values are guaranteed finite; anything else would poison distance
/// ordering downstream.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Coordinates;
///
/// let c = Coordinates::parse("53.3498", "-6.2603").unwrap();
/// assert_eq!(c.latitude(), 53.3498);
///
/// assert!(Coordinates::parse("north", "-6.2603").is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair, rejecting non-finite components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinates::new("not a finite number"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a coordinate pair from query-string text.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, InvalidCoordinates> {
        let lat: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinates::new("latitude is not a number"))?;
        let lon: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| InvalidCoordinates::new("longitude is not a number"))?;
        Self::new(lat, lon)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates({}, {})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points, in metres.
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let cos_angle = lat1.cos() * lat2.cos() * delta_lon.cos() + lat1.sin() * lat2.sin();
    EARTH_RADIUS_M * cos_angle.clamp(-1.0, 1.0).acos()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn coordinate()(lat in -90.0f64..90.0, lon in -180.0f64..180.0) -> Coordinates {
            Coordinates::new(lat, lon).unwrap()
        }
    }

    proptest! {
        /// Distances are always finite and non-negative.
        #[test]
        fn distance_finite_non_negative(a in coordinate(), b in coordinate()) {
            let d = haversine_meters(a, b);
            prop_assert!(d.is_finite());
            prop_assert!(d >= 0.0);
        }

        /// Distance is symmetric.
        #[test]
        fn distance_symmetric(a in coordinate(), b in coordinate()) {
            let forward = haversine_meters(a, b);
            let back = haversine_meters(b, a);
            prop_assert!((forward - back).abs() < 1e-6);
        }

        /// No point is further away than half the circumference.
        #[test]
        fn distance_bounded(a in coordinate(), b in coordinate()) {
            let d = haversine_meters(a, b);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
        }
    }
}
