//! Application state for the web layer.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::board::DepartureBoardBuilder;
use crate::locator::StopLocator;
use crate::realtime::RealtimeFeedCache;
use crate::store::TransitStore;
use crate::timetable::{TimetableConfig, WeeklyTimetableBuilder};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Row-level access to the static dataset.
    pub store: Arc<dyn TransitStore>,

    /// Nearest-stop ranking and name search.
    pub locator: Arc<StopLocator>,

    /// Departure board construction.
    pub boards: Arc<DepartureBoardBuilder>,

    /// Weekly timetable assembly.
    pub timetables: Arc<WeeklyTimetableBuilder>,

    /// Cached real-time feed.
    pub realtime: Arc<RealtimeFeedCache>,

    /// Timezone the reference instant ("now") is taken in.
    pub timezone: Tz,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        store: Arc<dyn TransitStore>,
        realtime: RealtimeFeedCache,
        timetable_config: TimetableConfig,
        timezone: Tz,
    ) -> Self {
        Self {
            locator: Arc::new(StopLocator::new(store.clone())),
            boards: Arc::new(DepartureBoardBuilder::new(store.clone())),
            timetables: Arc::new(WeeklyTimetableBuilder::new(store.clone(), timetable_config)),
            store,
            realtime: Arc::new(realtime),
            timezone,
        }
    }
}
