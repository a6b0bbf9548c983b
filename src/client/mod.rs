//! Request execution: rate limiting, retry with backoff, wire formatting.
//!
//! [`RequestClient::execute`] runs one logical request end to end:
//!
//! ```text
//!  adapter.build_request ──► [ limiter.acquire ─► transport.send ─► classify ─► adapter.parse_response ]
//!                                  ▲                                                    │
//!                                  └──────────── backoff (transient errors only) ◄──────┘
//! ```
//!
//! Every attempt passes through the rate limiter and counts against its
//! window, including attempts that then fail.

pub mod retry;

pub use retry::RetryConfig;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::limiter::{RateLimitConfig, RateLimiter};
use crate::providers::ProviderAdapter;
use crate::telemetry;
use crate::transport::{HttpRequest, Transport};
use crate::types::Payload;
use crate::{BifrostError, Result};

use retry::with_retry;

/// Longest slice of an error body kept in `Http` error messages.
const MAX_ERROR_BODY: usize = 200;

/// Provider-agnostic client that owns the rate limiter and retry policy.
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
    retry: RetryConfig,
    completed: AtomicU64,
}

impl RequestClient {
    pub fn new(transport: Arc<dyn Transport>, rate_limit: &RateLimitConfig, retry: RetryConfig) -> Self {
        Self {
            transport,
            limiter: RateLimiter::new(rate_limit),
            retry,
            completed: AtomicU64::new(0),
        }
    }

    /// Execute one logical request and return the generated text.
    ///
    /// Payloads the adapter cannot encode fail immediately without
    /// consuming rate-limit budget.
    #[instrument(skip_all, fields(provider = adapter.name(), model = adapter.model()))]
    pub async fn execute(
        &self,
        adapter: &dyn ProviderAdapter,
        payload: &Payload,
        api_key: &str,
    ) -> Result<String> {
        let request = adapter.build_request(payload, api_key)?;
        let start = Instant::now();

        let result = with_retry(&self.retry, adapter.name(), || {
            self.attempt(adapter, &request)
        })
        .await;

        record_request(adapter.name(), start, result.is_ok());
        if result.is_ok() {
            let total = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                completed = total,
                "request completed"
            );
        }
        result
    }

    async fn attempt(&self, adapter: &dyn ProviderAdapter, request: &HttpRequest) -> Result<String> {
        let waited = self.limiter.acquire().await;
        if !waited.is_zero() {
            debug!(waited_ms = waited.as_millis() as u64, "released by rate limiter");
        }

        let response = self.transport.send(request.clone()).await?;
        match response.status {
            200..=299 => {}
            429 => return Err(BifrostError::RateLimited),
            status => {
                return Err(BifrostError::Http {
                    status,
                    message: error_message(&response.body),
                });
            }
        }

        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        adapter.parse_response(&body)
    }

    /// Number of logical requests that have succeeded.
    pub fn completed_requests(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }
}

fn record_request(provider: &str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "provider" => provider.to_owned(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "provider" => provider.to_owned(),
    )
    .record(start.elapsed().as_secs_f64());
}

/// Pull a readable message out of an error body.
///
/// Both Gemini and OpenAI-style APIs return `{"error": {"message": ...}}`;
/// anything else is passed through, truncated.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = json["error"]["message"].as_str()
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(error_message(body), "API key not valid");
    }

    #[test]
    fn error_message_truncates_raw_body() {
        let body = "x".repeat(500);
        let msg = error_message(&body);
        assert_eq!(msg.len(), MAX_ERROR_BODY + 3);
        assert!(msg.ends_with("..."));
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
