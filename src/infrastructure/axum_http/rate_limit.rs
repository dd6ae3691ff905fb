use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

const RATE_LIMIT_MAX: usize = 5;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Sliding-window limiter keyed by client IP. Owned by the intake router and
/// injected into its handlers; per-process state, reset on restart.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(RATE_LIMIT_MAX, RATE_LIMIT_WINDOW)
    }

    pub fn with_limits(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true when the client is over its window. An unattributable
    /// client (empty ip) is never limited.
    pub async fn is_limited(&self, client_ip: &str) -> bool {
        if client_ip.is_empty() {
            return false;
        }

        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let timestamps = hits.entry(client_ip.to_string()).or_default();
        timestamps.retain(|timestamp| now.duration_since(*timestamp) < self.window);
        if timestamps.len() >= self.max_requests {
            return true;
        }
        timestamps.push(now);
        false
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
