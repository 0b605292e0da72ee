//! Domain types for the transit information server.
//!
//! This module contains the core domain model: strongly-typed GTFS records
//! with explicit optional fields, the fixed weekday enumeration, service
//! calendar resolution, and geospatial distance math. Nothing in here talks
//! to the database or the network.

mod calendar;
mod geo;
mod ids;
mod route;
mod stop;
mod stop_time;
mod trip;

pub use calendar::{ServiceCalendar, Weekday};
pub use geo::{Coordinates, EARTH_RADIUS_M, InvalidCoordinates, haversine_meters};
pub use ids::{RouteId, ServiceId, StopId, TripId};
pub use route::Route;
pub use stop::Stop;
pub use stop_time::StopTime;
pub use trip::{Direction, Trip};
