//! Route records.

use super::ids::RouteId;

/// A route from the static dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub route_id: RouteId,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
}

impl Route {
    pub fn new(route_id: RouteId) -> Self {
        Self {
            route_id,
            route_short_name: None,
            route_long_name: None,
        }
    }
}
