//! Telemetry metric name constants.
//!
//! Centralised metric names for bifrost operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bifrost_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: provider name (e.g. "gemini", "groq")
//! - `status`: outcome: "ok" or "error"
//! - `content`: content type: "text", "image" or "media"

/// Total logical requests executed by the request client.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bifrost_requests_total";

/// Logical request duration in seconds, including retries and waits.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "bifrost_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "bifrost_retries_total";

/// Total times the rate limiter suspended a caller.
pub const RATE_LIMIT_WAITS_TOTAL: &str = "bifrost_rate_limit_waits_total";

/// Total cache hits.
///
/// Labels: `content`.
pub const CACHE_HITS_TOTAL: &str = "bifrost_cache_hits_total";

/// Total cache misses.
///
/// Labels: `content`.
pub const CACHE_MISSES_TOTAL: &str = "bifrost_cache_misses_total";
