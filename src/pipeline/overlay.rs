use crate::pipeline::progress::{interpolate, remaining_route};
use crate::state::RouteSnapshot;
use crate::types::overlay::{OverlayOptions, PolylineStyle, RouteOverlay};
use crate::types::progress::Progress;

pub fn compose(
    snapshot: Option<&RouteSnapshot>,
    progress: Option<Progress>,
    options: OverlayOptions,
) -> RouteOverlay {
    let Some(snapshot) = snapshot else {
        return RouteOverlay::empty(options.active);
    };
    let route = &snapshot.route;
    let lengths = snapshot.lengths.as_ref();

    let vehicle = progress.map(|progress| interpolate(route, lengths, progress));
    let remaining = progress
        .map(|progress| remaining_route(route, lengths, progress).to_vec())
        .unwrap_or_default();
    let drop_off = options.drop_off.then(|| route.last());

    RouteOverlay {
        vehicle,
        remaining,
        style: PolylineStyle::for_activity(options.active),
        drop_off,
    }
}

pub fn log_overlay(path_id: &str, snapshot: Option<&RouteSnapshot>, overlay: &RouteOverlay) {
    tracing::info!(
        path_id,
        vehicle = ?overlay.vehicle,
        route = ?snapshot.map(|snapshot| snapshot.route.points()),
        "Overlay debug"
    );
}
