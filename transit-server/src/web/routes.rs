//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tower_http::trace::TraceLayer;

use crate::board::BoardError;
use crate::domain::{Coordinates, RouteId};
use crate::locator::LocatorError;
use crate::realtime::FeedError;
use crate::store::StoreError;
use crate::timetable::TimetableError;

use super::dto::*;
use super::state::AppState;

/// Departure rows attached to each stop result.
const BOARD_LIMIT: usize = 8;

/// Stops returned by the nearest-stops and stop-search endpoints.
const STOP_LIMIT: usize = 8;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nearestStops", get(nearest_stops))
        .route("/stops", get(search_stops))
        .route("/timetable", get(route_timetable))
        .route("/routes", get(search_routes))
        .route("/gtfsr", get(realtime_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The reference instant in the service timezone.
fn local_now(timezone: Tz) -> (NaiveDate, NaiveTime) {
    let now = Utc::now().with_timezone(&timezone);
    (now.date_naive(), now.time())
}

/// Nearest stops to a point, each with its upcoming departures.
async fn nearest_stops(
    State(state): State<AppState>,
    Query(params): Query<NearestStopsParams>,
) -> Result<Json<Vec<NearestStopDto>>, AppError> {
    let (Some(lat), Some(lng)) = (params.lat.as_deref(), params.lng.as_deref()) else {
        return Err(AppError::BadRequest {
            message: "lat and lng are required".to_string(),
        });
    };
    let origin = Coordinates::parse(lat, lng).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let ranked = state.locator.nearest_stops(origin, STOP_LIMIT).await?;

    let (date, time) = local_now(state.timezone);
    let mut results = Vec::with_capacity(ranked.len());
    for stop in &ranked {
        let board = state
            .boards
            .board(&stop.stop.stop_id, date, time, BOARD_LIMIT)
            .await?;
        results.push(NearestStopDto::from_ranked(stop, &board));
    }

    Ok(Json(results))
}

/// Stops matching a name query, each with its upcoming departures.
async fn search_stops(
    State(state): State<AppState>,
    Query(params): Query<StopSearchParams>,
) -> Result<Json<Vec<StopSearchResultDto>>, AppError> {
    let Some(query) = params.query.as_deref() else {
        return Err(AppError::BadRequest {
            message: "query is required".to_string(),
        });
    };

    let stops = state.locator.search_by_name(query, STOP_LIMIT).await?;

    let (date, time) = local_now(state.timezone);
    let mut results = Vec::with_capacity(stops.len());
    for stop in &stops {
        let board = state
            .boards
            .board(&stop.stop_id, date, time, BOARD_LIMIT)
            .await?;
        results.push(StopSearchResultDto::from_stop(stop, &board));
    }

    Ok(Json(results))
}

/// Weekly timetable for a route.
async fn route_timetable(
    State(state): State<AppState>,
    Query(params): Query<TimetableParams>,
) -> Result<Json<TimetableResponse>, AppError> {
    let Some(route_id) = params.route_id.as_deref() else {
        return Err(AppError::BadRequest {
            message: "route_id is required".to_string(),
        });
    };

    let (reference_date, _) = local_now(state.timezone);
    let timetable = state
        .timetables
        .timetable(&RouteId::new(route_id), reference_date)
        .await?;

    Ok(Json(TimetableResponse::from_timetable(&timetable)))
}

/// Routes matching a name query.
async fn search_routes(
    State(state): State<AppState>,
    Query(params): Query<RouteSearchParams>,
) -> Result<Json<RouteSearchResponse>, AppError> {
    let Some(search_query) = params.search_query.as_deref() else {
        return Err(AppError::BadRequest {
            message: "search_query is required".to_string(),
        });
    };
    if search_query.is_empty() {
        return Err(AppError::BadRequest {
            message: "search_query must not be empty".to_string(),
        });
    }

    let routes = state.store.search_routes(search_query).await?;
    Ok(Json(RouteSearchResponse {
        routes: routes.iter().map(RouteDto::from_route).collect(),
    }))
}

/// The cached real-time feed, passed through unmodified.
async fn realtime_feed(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = state.realtime.get().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<LocatorError> for AppError {
    fn from(e: LocatorError) -> Self {
        match e {
            LocatorError::EmptyQuery => AppError::BadRequest {
                message: e.to_string(),
            },
            LocatorError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        match e {
            TimetableError::RouteNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            TimetableError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
