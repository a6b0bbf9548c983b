//! Retry configuration and the shared retry loop.
//!
//! Backoff is exponential without jitter: after the `n`-th failed attempt
//! the client waits `retry_delay * 2^n` before trying again, so delays are
//! deterministic and reproducible.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::Result;
use crate::telemetry;

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use bifrost::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(5)
///     .retry_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Zero is treated as one. Default: 3.
    pub max_retries: u32,
    /// Base backoff delay. Default: 1s.
    #[serde(rename = "retry_delay_ms", with = "crate::config::millis")]
    pub retry_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 60s.
    #[serde(rename = "max_delay_ms", with = "crate::config::millis")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the base backoff delay.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Total attempts, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait after `failures` failed attempts (1-indexed).
    ///
    /// `retry_delay * 2^failures`, capped at `max_delay`.
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        let delay = self
            .retry_delay
            .saturating_mul(2u32.saturating_pow(failures));
        delay.min(self.max_delay)
    }
}

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by
/// [`BifrostError::is_transient()`](crate::BifrostError::is_transient)) until
/// `config.attempts()` attempts have been made. Permanent errors are
/// returned immediately; after the last attempt the final error is
/// returned as is.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, provider_name: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.attempts();
    let mut failures = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && failures + 1 < attempts => {
                failures += 1;
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "provider" => provider_name.to_owned(),
                )
                .increment(1);
                let delay = config.backoff_delay(failures);
                warn!(
                    provider = provider_name,
                    attempt = failures,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
