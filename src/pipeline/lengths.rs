use crate::types::geo::{Coordinate, LengthTable, Route};

const EARTH_RADIUS_KM: f64 = 6371.0;

impl LengthTable {
    /// Builds the table for an ordered point sequence. Fewer than two points
    /// yield the degenerate table (no segments, zero total).
    pub fn from_points(points: &[Coordinate]) -> Self {
        let lengths: Vec<f64> = points
            .windows(2)
            .map(|pair| haversine_distance(pair[0], pair[1]))
            .collect();
        let total = lengths.iter().sum();
        Self { lengths, total }
    }
}

pub fn build_length_table(route: Option<&Route>) -> Option<LengthTable> {
    route.map(|route| LengthTable::from_points(route.points()))
}

/// Great-circle distance in km. Used for every distance comparison in the crate.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
