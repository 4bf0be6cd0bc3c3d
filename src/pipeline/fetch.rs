use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::types::geo::{Coordinate, Route};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: Coordinate,
    pub end: Coordinate,
}

// openrouteservice GeoJSON directions response, only the parts we read.
#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Clone)]
pub struct RoutingClient {
    base_url: String,
    client: reqwest::Client,
}

impl RoutingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Falling back to default HTTP client: {}", err);
                reqwest::Client::new()
            });
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// The routing backend takes `lon,lat` pairs.
    pub fn directions_url(&self, path: &PathRequest) -> String {
        format!(
            "{}?start={},{}&end={},{}",
            self.base_url, path.start.lon, path.start.lat, path.end.lon, path.end.lat
        )
    }

    pub async fn fetch_route(&self, path: &PathRequest) -> Result<Route, FetchError> {
        let url = self.directions_url(path);
        tracing::debug!("Requesting route: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let payload: DirectionsResponse = response.json().await?;
        parse_route(payload)
    }

    /// Same as [`fetch_route`](Self::fetch_route) with every failure turned
    /// into "no route".
    pub async fn fetch_route_or_none(&self, path: &PathRequest) -> Option<Route> {
        match self.fetch_route(path).await {
            Ok(route) => Some(route),
            Err(err) => {
                tracing::warn!("Route fetch failed: {}", err);
                None
            }
        }
    }
}

fn parse_route(payload: DirectionsResponse) -> Result<Route, FetchError> {
    let feature = payload
        .features
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Schema("response has no features".to_string()))?;

    let points = feature
        .geometry
        .coordinates
        .into_iter()
        .enumerate()
        .map(|(idx, pair)| match pair.as_slice() {
            [lon, lat] => Ok(Coordinate::new(*lat, *lon)),
            _ => Err(FetchError::Schema(format!(
                "coordinate {} has {} values, expected [lon, lat]",
                idx,
                pair.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Route::new(points).ok_or_else(|| FetchError::Schema("route geometry is empty".to_string()))
}
