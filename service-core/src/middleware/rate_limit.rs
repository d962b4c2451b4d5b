use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

/// Sliding-window admission counter.
///
/// Tracks admission timestamps per key and admits a request only while fewer
/// than `limit` admissions fall inside the trailing window. Stale timestamps
/// are pruned on every check, so a key idle for a full window starts from a
/// clean slate. State is process-local: behind a load balancer each instance
/// enforces its own budget.
#[derive(Debug)]
pub struct SlidingWindow {
    limit: usize,
    window: Duration,
    hits: DashMap<String, Vec<Instant>>,
}

pub type SharedSlidingWindow = Arc<SlidingWindow>;

impl SlidingWindow {
    pub fn new(limit: u32, window: Duration) -> SharedSlidingWindow {
        Arc::new(Self {
            limit: limit as usize,
            window,
            hits: DashMap::new(),
        })
    }

    /// Admits or rejects one request for `key`, recording it when admitted.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut stamps = self.hits.entry(key.to_string()).or_default();
        stamps.retain(|t| now.duration_since(*t) < self.window);
        if stamps.len() >= self.limit {
            return false;
        }
        stamps.push(now);
        true
    }

    /// Seconds a rejected caller should wait before trying again.
    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }
}

/// Middleware admitting requests by client address, for routes that have no
/// session to key on. Honors the first hop of `x-forwarded-for` so the
/// balancer's address does not pool every caller under one key.
pub async fn ip_rate_limit_middleware(
    State(limiter): State<SharedSlidingWindow>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);
    if !limiter.allow(&ip) {
        return Err(AppError::TooManyRequests(
            "Too Many Requests".to_string(),
            Some(limiter.retry_after_secs()),
        ));
    }
    Ok(next.run(request).await)
}

fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_limit_then_rejects() {
        let limiter = SlidingWindow::new(3, Duration::from_secs(60));
        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(!limiter.allow("a"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = SlidingWindow::new(1, Duration::from_secs(60));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
    }

    #[test]
    fn window_expiry_restores_full_budget() {
        let limiter = SlidingWindow::new(2, Duration::from_millis(40));
        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));

        std::thread::sleep(Duration::from_millis(50));

        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
    }

    #[test]
    fn rejected_requests_are_not_recorded() {
        let limiter = SlidingWindow::new(1, Duration::from_millis(40));
        assert!(limiter.allow("a"));
        // Hammering while rejected must not extend the lockout.
        for _ in 0..5 {
            assert!(!limiter.allow("a"));
        }
        std::thread::sleep(Duration::from_millis(50));
        assert!(limiter.allow("a"));
    }

    #[test]
    fn retry_after_reflects_window() {
        let limiter = SlidingWindow::new(1, Duration::from_secs(60));
        assert_eq!(limiter.retry_after_secs(), 60);
    }
}
