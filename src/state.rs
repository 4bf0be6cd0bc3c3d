use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::config::Config;
use crate::pipeline::fetch::{PathRequest, RoutingClient};
use crate::types::geo::{LengthTable, Route};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    routing: RoutingClient,
    paths: DashMap<String, TrackedPath>,
    next_request: AtomicU64,
}

/// Route currently shown for a path, with its derived length table.
#[derive(Debug, Clone)]
pub struct RouteSnapshot {
    pub route: Route,
    pub lengths: Arc<LengthTable>,
    pub request_id: u64,
    pub fetched_at: DateTime<Utc>,
}

struct TrackedPath {
    path: PathRequest,
    latest_request: u64,
    snapshot: Option<RouteSnapshot>,
    in_flight: bool,
    debug: bool,
    touched_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTicket {
    pub request_id: u64,
    pub needs_fetch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued after this one; the response is dropped.
    Stale,
    /// The fetch produced no route; whatever was shown before stays.
    Failed,
    Unknown,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let routing = RoutingClient::new(config.routing_url.clone(), config.routing_timeout);
        Self {
            inner: Arc::new(Inner {
                config,
                routing,
                paths: DashMap::new(),
                next_request: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn routing(&self) -> &RoutingClient {
        &self.inner.routing
    }

    /// Registers `path` under `id`. A new request id is issued when the path is
    /// new, differs from the tracked one, or its last fetch failed.
    /// Resubmitting the same path while its fetch is in flight, or after it
    /// succeeded, reuses that request.
    pub fn track_path(&self, id: &str, path: PathRequest) -> PathTicket {
        let mut entry = self
            .inner
            .paths
            .entry(id.to_string())
            .or_insert_with(|| TrackedPath {
                path,
                latest_request: 0,
                snapshot: None,
                in_flight: false,
                debug: false,
                touched_at: Instant::now(),
            });

        entry.touched_at = Instant::now();
        let resolved = entry
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.request_id == entry.latest_request);
        if entry.latest_request != 0 && entry.path == path && (entry.in_flight || resolved) {
            return PathTicket {
                request_id: entry.latest_request,
                needs_fetch: false,
            };
        }

        let request_id = self.inner.next_request.fetch_add(1, Ordering::Relaxed);
        entry.path = path;
        entry.latest_request = request_id;
        entry.in_flight = true;
        PathTicket {
            request_id,
            needs_fetch: true,
        }
    }

    pub fn apply_route(&self, id: &str, request_id: u64, route: Option<Route>) -> ApplyOutcome {
        let Some(mut entry) = self.inner.paths.get_mut(id) else {
            return ApplyOutcome::Unknown;
        };
        if entry.latest_request != request_id {
            tracing::debug!(
                "Dropping stale route for {} (request {}, latest {})",
                id,
                request_id,
                entry.latest_request
            );
            return ApplyOutcome::Stale;
        }
        entry.in_flight = false;
        let Some(route) = route else {
            return ApplyOutcome::Failed;
        };

        let lengths = Arc::new(LengthTable::from_points(route.points()));
        tracing::info!(
            "Route for {} updated ({} points, {:.2} km)",
            id,
            route.len(),
            lengths.total
        );
        entry.snapshot = Some(RouteSnapshot {
            route,
            lengths,
            request_id,
            fetched_at: Utc::now(),
        });
        entry.touched_at = Instant::now();
        ApplyOutcome::Applied
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.paths.contains_key(id)
    }

    pub fn path(&self, id: &str) -> Option<PathRequest> {
        self.inner.paths.get(id).map(|entry| entry.path)
    }

    pub fn latest_request(&self, id: &str) -> Option<u64> {
        self.inner.paths.get(id).map(|entry| entry.latest_request)
    }

    pub fn snapshot(&self, id: &str) -> Option<RouteSnapshot> {
        self.inner
            .paths
            .get(id)
            .and_then(|entry| entry.snapshot.clone())
    }

    pub fn debug_enabled(&self, id: &str) -> bool {
        self.inner
            .paths
            .get(id)
            .map(|entry| entry.debug)
            .unwrap_or(false)
    }

    pub fn toggle_debug(&self, id: &str) -> Option<bool> {
        let mut entry = self.inner.paths.get_mut(id)?;
        entry.debug = !entry.debug;
        Some(entry.debug)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.inner.paths.remove(id).is_some()
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.inner
            .paths
            .retain(|_, tracked| now.duration_since(tracked.touched_at) < ttl);
        tracing::info!(
            "Path eviction complete. Current size: {}",
            self.inner.paths.len()
        );
    }
}

/// Fetches the route for a ticket and applies it if it is still the latest
/// request for `id`.
pub async fn refresh_route(
    state: AppState,
    id: String,
    path: PathRequest,
    ticket: PathTicket,
) -> ApplyOutcome {
    let route = state.routing().fetch_route_or_none(&path).await;
    state.apply_route(&id, ticket.request_id, route)
}
