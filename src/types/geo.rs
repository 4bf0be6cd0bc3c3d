use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A geographic position, latitude first.
///
/// Serialized as a `[lat, lon]` pair so it can be handed to Leaflet-style
/// consumers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lat, coord.lon]
    }
}

/// Ordered, non-empty polyline from origin to destination.
///
/// Immutable once built; clones share the same allocation so identity can be
/// used as a cache key.
#[derive(Debug, Clone)]
pub struct Route {
    points: Arc<[Coordinate]>,
}

impl Route {
    pub fn new(points: Vec<Coordinate>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            points: points.into(),
        })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn first(&self) -> Coordinate {
        self.points[0]
    }

    pub fn last(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn same_as(&self, other: &Route) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl Deref for Route {
    type Target = [Coordinate];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points().serialize(serializer)
    }
}

/// Per-segment distances of a route (km) and their sum.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LengthTable {
    pub lengths: Vec<f64>,
    pub total: f64,
}

impl LengthTable {
    pub fn is_degenerate(&self) -> bool {
        self.lengths.is_empty() || self.total <= f64::EPSILON
    }
}
