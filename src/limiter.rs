//! Fixed-window rate limiter for outbound provider requests.
//!
//! Allows at most `limit` requests per `window`. A caller arriving while the
//! window is full is suspended until the window would end, then the counter
//! is reset. The window start is **not** moved when a throttled caller is
//! released; it only moves when a caller arrives after the window has fully
//! elapsed. Under sustained bursts the boundary therefore stays anchored to
//! the last time a fresh window began.
//!
//! Window state sits behind an async mutex that is held across the wait, so
//! throttled callers queue up and are released one at a time.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

/// Rate limit parameters.
///
/// ```rust
/// # use bifrost::RateLimitConfig;
/// # use std::time::Duration;
/// let config = RateLimitConfig::new()
///     .limit(10)
///     .window(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window. Zero is treated as one. Default: 5.
    pub limit: u32,
    /// Window length. Default: 10s.
    #[serde(rename = "window_secs", with = "crate::config::secs")]
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(10),
        }
    }
}

impl RateLimitConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of requests allowed per window.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = n;
        self
    }

    /// Set the window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }
}

#[derive(Debug)]
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// Fixed-window limiter owned by a single [`RequestClient`](crate::RequestClient).
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<RateWindow>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            limit: config.limit.max(1),
            window: config.window,
            state: Mutex::new(RateWindow {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Wait until a request may proceed, then count it against the window.
    ///
    /// Returns how long the caller was suspended.
    pub async fn acquire(&self) -> Duration {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(state.window_start);
        let mut waited = Duration::ZERO;

        if elapsed >= self.window {
            state.window_start = now;
            state.count = 0;
        } else if state.count >= self.limit {
            let delay = self.window - elapsed;
            debug!(
                delay_ms = delay.as_millis() as u64,
                limit = self.limit,
                "rate limit reached, waiting for window"
            );
            metrics::counter!(telemetry::RATE_LIMIT_WAITS_TOTAL).increment(1);
            tokio::time::sleep(delay).await;
            // window_start stays where it was
            state.count = 0;
            waited = delay;
        }

        state.count += 1;
        waited
    }

    /// Requests counted in the current window.
    pub async fn count(&self) -> u32 {
        self.state.lock().await.count
    }

    /// When the current window began.
    pub async fn window_start(&self) -> Instant {
        self.state.lock().await.window_start
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
