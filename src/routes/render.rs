use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::pipeline::{animate, rasterize, render};
use crate::routes::overlay::{overlay_for, OverlayQuery};
use crate::state::AppState;
use crate::types::overlay::{OutputConfig, OverlayOptions, RenderOptions};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/paths/:path_id/render", get(render_overlay))
        .route("/api/paths/:path_id/animate", post(animate_route))
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ImageFormat {
    #[default]
    Png,
    Svg,
}

#[derive(Debug, Deserialize)]
struct RenderQuery {
    progress: Option<f64>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    drop_off: bool,
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    format: ImageFormat,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnimateRequest {
    frames: Option<u32>,
    duration_ms: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    drop_off: bool,
    background: Option<String>,
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), AppError> {
    const MIN_DIM: u32 = 64;
    const MAX_DIM: u32 = 4096;
    const MAX_MEGAPIXELS: f64 = 10.0;

    if !(MIN_DIM..=MAX_DIM).contains(&width) || !(MIN_DIM..=MAX_DIM).contains(&height) {
        return Err(AppError::BadRequest(format!(
            "Invalid dimensions: {}x{}. Width/height must be between {} and {}",
            width, height, MIN_DIM, MAX_DIM
        )));
    }

    let megapixels = (width as f64 * height as f64) / 1_000_000.0;
    if megapixels > MAX_MEGAPIXELS {
        return Err(AppError::BadRequest(format!(
            "Image too large: {}x{} ({:.2} MP). Max allowed is {:.1} MP",
            width, height, megapixels, MAX_MEGAPIXELS
        )));
    }

    Ok(())
}

fn render_options(width: Option<u32>, height: Option<u32>) -> Result<RenderOptions, AppError> {
    let mut options = RenderOptions::default();
    match (width, height) {
        (Some(width), Some(height)) => {
            validate_dimensions(width, height)?;
            options.width = width;
            options.height = height;
        }
        (None, None) => {}
        _ => {
            return Err(AppError::BadRequest(
                "Both width and height must be provided together".to_string(),
            ))
        }
    }
    Ok(options)
}

fn parse_background(background: Option<&str>) -> Result<Option<(u8, u8, u8, u8)>, AppError> {
    match background {
        Some("white") | None => Ok(Some((255, 255, 255, 255))),
        Some("black") => Ok(Some((0, 0, 0, 255))),
        Some("transparent") => Ok(None),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid background: {}. Use 'transparent', 'white', or 'black'",
            other
        ))),
    }
}

async fn render_overlay(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse, AppError> {
    let options = render_options(query.width, query.height)?;
    let background = parse_background(query.background.as_deref())?;
    let overlay_query = OverlayQuery {
        progress: query.progress,
        active: query.active,
        drop_off: query.drop_off,
    };
    let layers = overlay_for(&state, &path_id, &overlay_query)?;
    let snapshot = state
        .snapshot(&path_id)
        .ok_or_else(|| AppError::NoRoute(path_id.clone()))?;

    let svg = render::render_svg(&snapshot.route, &layers, &options)?;
    let (content_type, body) = match query.format {
        ImageFormat::Svg => ("image/svg+xml", svg.into_bytes()),
        ImageFormat::Png => {
            let output = OutputConfig {
                width: options.width,
                height: options.height,
                background,
            };
            ("image/png", rasterize::rasterize(&svg, &output)?)
        }
    };

    tracing::info!(
        "Rendered {} for {} ({}x{}, {} bytes)",
        content_type,
        path_id,
        options.width,
        options.height,
        body.len()
    );

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body))
}

async fn animate_route(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Json(req): Json<AnimateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.contains(&path_id) {
        return Err(AppError::NotFound(path_id));
    }
    let snapshot = state
        .snapshot(&path_id)
        .ok_or_else(|| AppError::NoRoute(path_id.clone()))?;

    let options = render_options(req.width, req.height)?;
    let background = parse_background(req.background.as_deref())?;
    let animation = animate::AnimationOptions {
        frames: req.frames.unwrap_or(24).clamp(animate::MIN_FRAMES, 120),
        duration_ms: req.duration_ms.unwrap_or(2000).clamp(250, 10_000),
        overlay: OverlayOptions {
            active: req.active,
            drop_off: req.drop_off,
        },
    };
    let output = OutputConfig {
        width: options.width,
        height: options.height,
        background,
    };

    tracing::info!(
        "Generating route animation for {} ({}x{}, {} frames)",
        path_id,
        options.width,
        options.height,
        animation.frames
    );

    let bytes = tokio::task::spawn_blocking(move || {
        animate::render_apng(&snapshot, &animation, &options, &output)
    })
    .await
    .map_err(|err| {
        AppError::Raster(crate::error::RasterError::AnimationFailed(format!(
            "Animation task failed: {}",
            err
        )))
    })??;

    tracing::info!("Generated APNG: {} bytes", bytes.len());

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/apng")], bytes))
}
