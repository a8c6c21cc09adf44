//! Client configuration loaded from the environment.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings shared by the transport and the query cache.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL, without the trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request when set.
    pub auth_token: Option<String>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Extra attempts for failed queries. Mutations never retry.
    pub query_retry: u32,
    /// Wait before the first query retry.
    pub query_retry_delay: Duration,
    /// How long fetched data counts as fresh.
    pub query_stale_time: Duration,
    /// How long an untouched cache entry is kept.
    pub query_gc_time: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            timeout: None,
            query_retry: 1,
            query_retry_delay: Duration::from_secs(1),
            query_stale_time: Duration::ZERO,
            query_gc_time: Duration::from_secs(5 * 60),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ASISTENCIA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            auth_token: std::env::var("ASISTENCIA_API_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout: std::env::var("ASISTENCIA_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
            query_retry: std::env::var("ASISTENCIA_QUERY_RETRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.query_retry),
            query_retry_delay: env_duration("ASISTENCIA_QUERY_RETRY_DELAY_MS", Duration::from_millis)
                .unwrap_or(defaults.query_retry_delay),
            query_stale_time: env_duration("ASISTENCIA_QUERY_STALE_SECS", Duration::from_secs)
                .unwrap_or(defaults.query_stale_time),
            query_gc_time: env_duration("ASISTENCIA_QUERY_GC_SECS", Duration::from_secs)
                .unwrap_or(defaults.query_gc_time),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

fn env_duration(name: &str, unit: fn(u64) -> Duration) -> Option<Duration> {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).map(unit)
}
