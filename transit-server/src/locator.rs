//! Stop location: nearest-stop ranking and name search.

use std::sync::Arc;

use crate::domain::{Coordinates, Stop, haversine_meters};
use crate::store::{StoreError, TransitStore};

/// Errors from stop location queries.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// The name-search query was empty.
    #[error("search query must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A stop together with its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStop {
    pub stop: Stop,
    /// Great-circle distance in whole metres, truncated.
    pub distance_m: i64,
}

/// Ranks stops by distance to a point, or matches them by name.
pub struct StopLocator {
    store: Arc<dyn TransitStore>,
}

impl StopLocator {
    pub fn new(store: Arc<dyn TransitStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` stops ordered by ascending great-circle distance from
    /// `origin`. Stops without a usable coordinate pair cannot be ranked
    /// and are skipped. Ties are broken by stop id so the order is stable
    /// across runs.
    pub async fn nearest_stops(
        &self,
        origin: Coordinates,
        limit: usize,
    ) -> Result<Vec<RankedStop>, LocatorError> {
        let stops = self.store.all_stops().await?;

        let mut ranked: Vec<(f64, Stop)> = stops
            .into_iter()
            .filter_map(|stop| {
                let here = stop.coordinates()?;
                Some((haversine_meters(origin, here), stop))
            })
            .collect();

        // Distances are finite by construction, so total_cmp sorts them
        // the way partial_cmp would.
        ranked.sort_by(|(da, a), (db, b)| {
            da.total_cmp(db).then_with(|| a.stop_id.cmp(&b.stop_id))
        });
        ranked.truncate(limit);

        Ok(ranked
            .into_iter()
            .map(|(distance, stop)| RankedStop {
                stop,
                distance_m: distance as i64,
            })
            .collect())
    }

    /// Up to `limit` stops whose name contains `query` case-insensitively,
    /// ordered alphabetically by name (ties by stop id). The order is fixed
    /// here rather than left to the storage engine.
    pub async fn search_by_name(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Stop>, LocatorError> {
        if query.is_empty() {
            return Err(LocatorError::EmptyQuery);
        }

        let mut matches = self.store.search_stops(query).await?;
        matches.sort_by(|a, b| {
            let name_a = a.stop_name.as_deref().unwrap_or("").to_lowercase();
            let name_b = b.stop_name.as_deref().unwrap_or("").to_lowercase();
            name_a
                .cmp(&name_b)
                .then_with(|| a.stop_id.cmp(&b.stop_id))
        });
        matches.truncate(limit);
        Ok(matches)
    }
}
