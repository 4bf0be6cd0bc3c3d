pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;

use crate::state::AppState;

/// All HTTP routes, without the outer middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::paths::router())
        .merge(routes::overlay::router())
        .merge(routes::render::router())
        .with_state(state)
}
