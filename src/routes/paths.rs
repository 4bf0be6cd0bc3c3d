use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::fetch::PathRequest;
use crate::state::{refresh_route, AppState, PathTicket};
use crate::types::geo::{Coordinate, Route};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/paths", post(create_path))
        .route(
            "/api/paths/:path_id",
            get(get_path).put(update_path).delete(delete_path),
        )
        .route("/api/paths/:path_id/debug", post(toggle_debug))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TrackPathRequest {
    start: Coordinate,
    end: Coordinate,
    /// Block until the route fetch finished instead of fetching in the background.
    #[serde(default)]
    wait: bool,
}

#[derive(Serialize)]
struct TrackPathResponse {
    path_id: String,
    request_id: u64,
    route_available: bool,
}

#[derive(Serialize)]
struct PathDetails {
    path_id: String,
    path: PathRequest,
    request_id: Option<u64>,
    route: Option<Route>,
    segment_count: Option<usize>,
    total_length_km: Option<f64>,
    fetched_at: Option<DateTime<Utc>>,
    debug: bool,
}

#[derive(Serialize)]
struct DebugResponse {
    debug: bool,
}

async fn create_path(
    State(state): State<AppState>,
    Json(req): Json<TrackPathRequest>,
) -> Result<(StatusCode, Json<TrackPathResponse>), AppError> {
    let path_id = Uuid::new_v4().to_string();
    let response = track(&state, path_id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_path(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Json(req): Json<TrackPathRequest>,
) -> Result<Json<TrackPathResponse>, AppError> {
    if !state.contains(&path_id) {
        return Err(AppError::NotFound(path_id));
    }
    Ok(Json(track(&state, path_id, req).await?))
}

async fn track(
    state: &AppState,
    path_id: String,
    req: TrackPathRequest,
) -> Result<TrackPathResponse, AppError> {
    let path = PathRequest {
        start: req.start,
        end: req.end,
    };
    validate_path(&path)?;

    let ticket: PathTicket = state.track_path(&path_id, path);
    if ticket.needs_fetch {
        tracing::info!(
            "Fetching route for {} (request {})",
            path_id,
            ticket.request_id
        );
        let task = refresh_route(state.clone(), path_id.clone(), path, ticket);
        if req.wait {
            task.await;
        } else {
            tokio::spawn(task);
        }
    }

    Ok(TrackPathResponse {
        route_available: state.snapshot(&path_id).is_some(),
        path_id,
        request_id: ticket.request_id,
    })
}

fn validate_path(path: &PathRequest) -> Result<(), AppError> {
    for (label, coord) in [("start", path.start), ("end", path.end)] {
        if !coord.lat.is_finite() || !(-90.0..=90.0).contains(&coord.lat) {
            return Err(AppError::BadRequest(format!(
                "Invalid {} latitude: {}",
                label, coord.lat
            )));
        }
        if !coord.lon.is_finite() || !(-180.0..=180.0).contains(&coord.lon) {
            return Err(AppError::BadRequest(format!(
                "Invalid {} longitude: {}",
                label, coord.lon
            )));
        }
    }
    Ok(())
}

async fn get_path(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
) -> Result<Json<PathDetails>, AppError> {
    let path = state
        .path(&path_id)
        .ok_or_else(|| AppError::NotFound(path_id.clone()))?;
    let snapshot = state.snapshot(&path_id);

    Ok(Json(PathDetails {
        path,
        request_id: snapshot.as_ref().map(|s| s.request_id),
        segment_count: snapshot.as_ref().map(|s| s.lengths.lengths.len()),
        total_length_km: snapshot.as_ref().map(|s| s.lengths.total),
        fetched_at: snapshot.as_ref().map(|s| s.fetched_at),
        route: snapshot.map(|s| s.route),
        debug: state.debug_enabled(&path_id),
        path_id,
    }))
}

async fn delete_path(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.remove(&path_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(path_id))
    }
}

async fn toggle_debug(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
) -> Result<Json<DebugResponse>, AppError> {
    let enabled = state
        .toggle_debug(&path_id)
        .ok_or_else(|| AppError::NotFound(path_id.clone()))?;
    let label = if enabled { "on" } else { "off" };
    tracing::info!("Debug logging for {} is now {}", path_id, label);
    Ok(Json(DebugResponse { debug: enabled }))
}
