//! Web layer for the transit information server.
//!
//! Provides the HTTP endpoints for stop search, nearest stops, route
//! timetables, route search, and the real-time feed passthrough.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
