use std::time::Duration;

pub const DEFAULT_ROUTING_URL: &str = "http://localhost:4546/ors/v2/directions/driving-car";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub routing_url: String,
    pub routing_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let routing_url = std::env::var("ROUTING_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ROUTING_URL.to_string());

        let routing_timeout_seconds = std::env::var("ROUTING_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let cache_ttl_seconds = std::env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Self {
            port,
            routing_url,
            routing_timeout: Duration::from_secs(routing_timeout_seconds),
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
        }
    }
}
