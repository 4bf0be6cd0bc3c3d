use crate::error::RenderError;
use crate::types::geo::{Coordinate, Route};
use crate::types::overlay::{RenderOptions, RouteOverlay};

const GHOST_ROUTE_OPACITY: f64 = 0.18;
const VEHICLE_COLOR: &str = "#2B2D42";
const FLAG_COLOR: &str = "#E63946";
// Web-Mercator blows up at the poles.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Renders an overlay as an SVG document. The full route fixes the framing
/// so frames at different progress values line up.
pub fn render_svg(
    route: &Route,
    overlay: &RouteOverlay,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let width = options.width as f64;
    let height = options.height as f64;
    let padding = options.padding as f64;
    let view_width = width - 2.0 * padding;
    let view_height = height - 2.0 * padding;
    if view_width <= 0.0 || view_height <= 0.0 {
        return Err(RenderError::SvgError("Invalid viewport size".to_string()));
    }

    let viewport = Viewport::fit(route.points(), padding, view_width, view_height)?;

    let ghost = if options.ghost_route && route.len() >= 2 {
        format!(
            r##"<path d="{}" fill="none" stroke="{}" stroke-opacity="{:.2}" stroke-width="1.0" stroke-linecap="round" stroke-linejoin="round"/>"##,
            build_polyline_path(&viewport.project_all(route.points())),
            overlay.style.color,
            GHOST_ROUTE_OPACITY
        )
    } else {
        String::new()
    };

    let remaining = if overlay.remaining.len() >= 2 {
        format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{:.2}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            build_polyline_path(&viewport.project_all(&overlay.remaining)),
            overlay.style.color,
            overlay.style.opacity,
            overlay.style.weight
        )
    } else {
        String::new()
    };

    let vehicle = overlay
        .vehicle
        .map(|coord| vehicle_marker(viewport.project(coord), options.marker_radius as f64))
        .unwrap_or_default();
    let flag = overlay
        .drop_off
        .map(|coord| flag_marker(viewport.project(coord), options.marker_radius as f64))
        .unwrap_or_default();

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
  {}
  {}
  {}
  {}
</svg>"#,
        width, height, width, height, ghost, remaining, flag, vehicle
    ))
}

struct Viewport {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    fn fit(
        points: &[Coordinate],
        padding: f64,
        view_width: f64,
        view_height: f64,
    ) -> Result<Self, RenderError> {
        if points.is_empty() {
            return Err(RenderError::SvgError("No route points".to_string()));
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for point in points {
            let (x, y) = mercator_project(*point);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if !min_x.is_finite() || !min_y.is_finite() {
            return Err(RenderError::SvgError("Route has non-finite coordinates".to_string()));
        }

        let content_width = (max_x - min_x).max(f64::EPSILON);
        let content_height = (max_y - min_y).max(f64::EPSILON);
        let scale = (view_width / content_width).min(view_height / content_height);
        Ok(Self {
            min_x,
            max_y,
            scale,
            offset_x: padding + (view_width - content_width * scale) * 0.5,
            offset_y: padding + (view_height - content_height * scale) * 0.5,
        })
    }

    // SVG y grows downwards, mercator y grows northwards.
    fn project(&self, coord: Coordinate) -> (f64, f64) {
        let (x, y) = mercator_project(coord);
        (
            self.offset_x + (x - self.min_x) * self.scale,
            self.offset_y + (self.max_y - y) * self.scale,
        )
    }

    fn project_all(&self, coords: &[Coordinate]) -> Vec<(f64, f64)> {
        coords.iter().map(|coord| self.project(*coord)).collect()
    }
}

fn mercator_project(coord: Coordinate) -> (f64, f64) {
    let lat = coord.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = coord.lon;
    let y = (lat.to_radians().tan() + (1.0 / lat.to_radians().cos()))
        .ln()
        .to_degrees();
    (x, y)
}

fn build_polyline_path(points: &[(f64, f64)]) -> String {
    points.iter().enumerate().fold(String::new(), |mut s, (i, (x, y))| {
        if i == 0 {
            s.push_str(&format!("M {:.2} {:.2}", x, y));
        } else {
            s.push_str(&format!(" L {:.2} {:.2}", x, y));
        }
        s
    })
}

fn vehicle_marker(center: (f64, f64), radius: f64) -> String {
    format!(
        r##"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="#FFFFFF" stroke-width="2"/>"##,
        center.0, center.1, radius, VEHICLE_COLOR
    )
}

fn flag_marker(base: (f64, f64), size: f64) -> String {
    let (x, y) = base;
    let top = y - size * 3.0;
    format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2"/>
  <polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}"/>"#,
        x,
        y,
        x,
        top,
        VEHICLE_COLOR,
        x,
        top,
        x + size * 2.0,
        top + size * 0.75,
        x,
        top + size * 1.5,
        FLAG_COLOR
    )
}
