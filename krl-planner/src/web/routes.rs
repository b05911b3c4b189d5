//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{RailTime, Region, StationName};
use crate::planner::{CancelToken, RouteSearchEngine, SearchError, SearchRequest, SearchResult};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/journey/plan", post(plan_journey))
        .route("/trains/:id/occupancy", get(train_occupancy))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every station served, optionally only those in one region.
async fn list_stations(
    State(state): State<AppState>,
    Query(req): Query<StationsQuery>,
) -> Result<Json<StationsResponse>, AppError> {
    let region = parse_region(req.region.as_deref())?;

    let stations = match region {
        Some(region) => state.timetable.stations_in(region),
        None => state.timetable.all_stations(),
    };

    Ok(Json(StationsResponse {
        stations: stations
            .into_iter()
            .map(|s| s.display().to_string())
            .collect(),
    }))
}

/// Plan itineraries between two stations.
async fn plan_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanJourneyRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "invalid plan request: {e}");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let start = parse_station(&req.start)?;
    let destination = parse_station(&req.destination)?;
    let region = parse_region(req.region.as_deref())?;
    let reference = parse_reference_time(req.time.as_deref(), Local::now().naive_local())?;

    // Search from the start of the cache bucket so every request that
    // shares a cache entry gets the same answer
    let mut request = SearchRequest::new(
        start,
        destination,
        state.cache.bucket_start(reference),
        req.max_transfers.unwrap_or(DEFAULT_MAX_TRANSFERS),
    );
    if let Some(region) = region {
        request = request.in_region(region);
    }

    if let Some(cached) = state.cache.get(&request).await {
        debug!(start = %request.start, destination = %request.destination, "plan cache hit");
        return Ok(Json(PlanJourneyResponse::from_result(&cached)));
    }

    let result = Arc::new(run_search(&state, request.clone()).await?);
    state.cache.insert(&request, result.clone()).await;
    debug!(entries = state.cache.entry_count(), "plan cached");

    Ok(Json(PlanJourneyResponse::from_result(&result)))
}

/// Run a search on the blocking pool.
///
/// If the awaiting request is dropped the search is cancelled.
async fn run_search(state: &AppState, request: SearchRequest) -> Result<SearchResult, AppError> {
    let cancel = CancelToken::new();
    let _guard = cancel.drop_guard();

    let state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let engine = RouteSearchEngine::new(
            state.timetable.as_ref(),
            &state.interchanges,
            &state.occupancy,
            &state.config,
        );
        engine.search_with_cancel(&request, &cancel)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })?;

    outcome.map_err(AppError::from)
}

/// Predict occupancy along a train's route.
async fn train_occupancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(req): Query<OccupancyQuery>,
) -> Result<Json<TrainOccupancyResponse>, AppError> {
    let train = state.timetable.train(&id).ok_or_else(|| AppError::NotFound {
        message: format!("Train {id} not found"),
    })?;
    let at = parse_reference_time(req.time.as_deref(), Local::now().naive_local())?;

    let map = state.occupancy.predict(train, at);
    Ok(Json(TrainOccupancyResponse::new(
        train,
        state.occupancy.name(),
        &map,
    )))
}

fn parse_station(name: &str) -> Result<StationName, AppError> {
    StationName::parse(name).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_region(region: Option<&str>) -> Result<Option<Region>, AppError> {
    region
        .map(str::parse::<Region>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })
}

/// Parse "YYYY-MM-DDTHH:MM" or "HH:MM" (on `now`'s date). Absent means `now`.
fn parse_reference_time(time: Option<&str>, now: NaiveDateTime) -> Result<RailTime, AppError> {
    let Some(s) = time.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(RailTime::from_datetime(now));
    };

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(RailTime::from_datetime(dt));
    }

    RailTime::parse_hhmm(s, now.date()).map_err(|e| AppError::BadRequest {
        message: format!("Invalid time {s:?}: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The search stopped before finishing; retrying may succeed
    Unavailable { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            e if e.is_incomplete() => AppError::Unavailable {
                message: e.to_string(),
            },
            e => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => error!(%status, "{message}"),
            StatusCode::SERVICE_UNAVAILABLE => warn!(%status, "{message}"),
            _ => debug!(%status, "{message}"),
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
