//! Per-client rate limiting.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::web::error::ApiError;

/// Rate limiter for a single client.
pub type ClientRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A quota refills completely within a minute; anything idle longer than
/// this has nothing left to remember.
const IDLE_TTL: Duration = Duration::from_secs(120);

/// How often idle clients are forgotten.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

struct ClientEntry {
    limiter: ClientRateLimiter,
    last_seen: Instant,
}

/// Per-IP rate limiters for the API.
#[derive(Clone)]
pub struct RateLimitState {
    clients: Arc<Mutex<HashMap<String, ClientEntry>>>,
    quota: Quota,
    trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Create a limiter allowing `requests_per_minute` per client.
    ///
    /// Returns `None` for 0, which disables limiting. Proxy headers are only
    /// consulted for the client IP when `trust_proxy_headers` is set.
    pub fn new(requests_per_minute: u32, trust_proxy_headers: bool) -> Option<Self> {
        let per_minute = NonZeroU32::new(requests_per_minute)?;
        Some(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            quota: Quota::per_minute(per_minute),
            trust_proxy_headers,
        })
    }

    /// Check whether a request from `ip` is allowed.
    pub fn check(&self, ip: &str) -> bool {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = clients
            .entry(ip.to_string())
            .or_insert_with(|| ClientEntry {
                limiter: RateLimiter::direct(self.quota),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        entry.limiter.check().is_ok()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .map(|clients| clients.len())
            .unwrap_or_default()
    }

    /// Forget clients not seen for longer than `max_idle`.
    pub fn cleanup(&self, max_idle: Duration) {
        if let Ok(mut clients) = self.clients.lock() {
            clients.retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        }
    }

    /// Periodically forget idle clients in the background.
    pub fn start_cleanup_task(self) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup(IDLE_TTL);
            }
        });
    }

    /// Client IP used as the limiter key.
    fn client_ip(&self, req: &Request<Body>) -> String {
        if self.trust_proxy_headers {
            if let Some(ip) = forwarded_ip(req) {
                return ip;
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Client IP reported by a reverse proxy.
fn forwarded_ip(req: &Request<Body>) -> Option<String> {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());

    header("X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next())
        .or_else(|| header("X-Real-IP"))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Reject requests from clients over their quota with 429.
pub async fn api_rate_limit(state: RateLimitState, req: Request<Body>, next: Next) -> Response {
    let ip = state.client_ip(&req);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, "API rate limit exceeded");
        return ApiError::too_many_requests("Too many requests. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
