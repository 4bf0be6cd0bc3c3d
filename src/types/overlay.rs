use serde::Serialize;

use crate::types::geo::Coordinate;

pub const ROUTE_COLOR: &str = "#bca0bd";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolylineStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
}

impl PolylineStyle {
    pub fn for_activity(active: bool) -> Self {
        if active {
            Self {
                color: ROUTE_COLOR,
                weight: 3,
                opacity: 1.0,
            }
        } else {
            Self {
                color: ROUTE_COLOR,
                weight: 1,
                opacity: 0.8,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayOptions {
    pub active: bool,
    pub drop_off: bool,
}

/// Map layers for one tracked path: the vehicle marker, the unfinished part
/// of the route and an optional drop-off flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub vehicle: Option<Coordinate>,
    pub remaining: Vec<Coordinate>,
    pub style: PolylineStyle,
    pub drop_off: Option<Coordinate>,
}

impl RouteOverlay {
    pub fn empty(active: bool) -> Self {
        Self {
            vehicle: None,
            remaining: Vec::new(),
            style: PolylineStyle::for_activity(active),
            drop_off: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none() && self.remaining.is_empty() && self.drop_off.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub marker_radius: f32,
    pub ghost_route: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            padding: 40,
            marker_radius: 7.0,
            ghost_route: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub background: Option<(u8, u8, u8, u8)>,
}
