use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::pipeline::overlay;
use crate::state::AppState;
use crate::types::overlay::{OverlayOptions, RouteOverlay};
use crate::types::progress::Progress;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/paths/:path_id/overlay", get(get_overlay))
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct OverlayQuery {
    /// Fraction of the route already driven, `0.0..=1.0`.
    pub progress: Option<f64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub drop_off: bool,
}

impl OverlayQuery {
    pub(crate) fn progress(&self) -> Result<Option<Progress>, AppError> {
        match self.progress {
            Some(value) if !value.is_finite() => Err(AppError::BadRequest(format!(
                "Invalid progress: {}",
                value
            ))),
            Some(value) => Ok(Some(Progress::new(value))),
            None => Ok(None),
        }
    }

    pub(crate) fn options(&self) -> OverlayOptions {
        OverlayOptions {
            active: self.active,
            drop_off: self.drop_off,
        }
    }
}

/// Builds the overlay for a tracked path, logging it when debug is on.
pub(crate) fn overlay_for(
    state: &AppState,
    path_id: &str,
    query: &OverlayQuery,
) -> Result<RouteOverlay, AppError> {
    if !state.contains(path_id) {
        return Err(AppError::NotFound(path_id.to_string()));
    }
    let progress = query.progress()?;
    let snapshot = state.snapshot(path_id);
    let layers = overlay::compose(snapshot.as_ref(), progress, query.options());
    if state.debug_enabled(path_id) {
        overlay::log_overlay(path_id, snapshot.as_ref(), &layers);
    }
    Ok(layers)
}

async fn get_overlay(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Query(query): Query<OverlayQuery>,
) -> Result<Json<RouteOverlay>, AppError> {
    overlay_for(&state, &path_id, &query).map(Json)
}
