//! Tests for [`RequestClient`] retry, backoff and response classification.

mod common;

use std::sync::Arc;
use std::time::Duration;

use bifrost::{
    BifrostError, GeminiAdapter, GenerationParams, InlineData, OpenAiCompatibleAdapter, Payload,
    RateLimitConfig, RequestClient, RetryConfig,
};
use common::{ScriptedTransport, connection_error, gemini_ok, ok, status};
use tokio::time::Instant;

fn gemini() -> GeminiAdapter {
    GeminiAdapter::new("gemini-2.0-flash", GenerationParams::default())
}

fn client(transport: Arc<ScriptedTransport>, retry: RetryConfig) -> RequestClient {
    RequestClient::new(transport, &RateLimitConfig::default(), retry)
}

fn retry(max: u32, delay_ms: u64) -> RetryConfig {
    RetryConfig::new()
        .max_retries(max)
        .retry_delay(Duration::from_millis(delay_ms))
}

// =========================================================================
// Backoff schedule
// =========================================================================

#[tokio::test(start_paused = true)]
async fn exhausts_attempts_with_doubling_delays() {
    let transport = Arc::new(ScriptedTransport::always(connection_error()));
    let client = client(transport.clone(), retry(3, 1000));
    let start = Instant::now();

    let err = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap_err();

    assert!(matches!(err, BifrostError::Connection(_)));
    assert_eq!(transport.call_count(), 3);
    let offsets: Vec<_> = transport
        .call_times()
        .iter()
        .map(|t| t.duration_since(start))
        .collect();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_millis(2000),
            Duration::from_millis(6000),
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_millis(6000));
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_transient_failures() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        connection_error(),
        status(503, "unavailable"),
        gemini_ok("xin chào"),
    ]));
    let client = client(transport.clone(), retry(3, 100));

    let text = client
        .execute(&gemini(), &Payload::text("hello"), "key")
        .await
        .unwrap();

    assert_eq!(text, "xin chào");
    assert_eq!(transport.call_count(), 3);
    assert_eq!(client.completed_requests(), 1);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_when_disabled() {
    let transport = Arc::new(ScriptedTransport::always(connection_error()));
    let client = client(transport.clone(), RetryConfig::disabled());

    assert!(
        client
            .execute(&gemini(), &Payload::text("hi"), "key")
            .await
            .is_err()
    );
    assert_eq!(transport.call_count(), 1);
    assert_eq!(client.completed_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn backoff_respects_max_delay() {
    let transport = Arc::new(ScriptedTransport::always(connection_error()));
    let config = retry(4, 1000).max_delay(Duration::from_millis(3000));
    let client = client(transport.clone(), config);
    let start = Instant::now();

    let _ = client.execute(&gemini(), &Payload::text("hi"), "key").await;

    // 2000 + min(4000, 3000) + min(8000, 3000)
    assert_eq!(start.elapsed(), Duration::from_millis(8000));
}

// =========================================================================
// Classification
// =========================================================================

#[tokio::test(start_paused = true)]
async fn status_429_is_rate_limited() {
    let transport = Arc::new(ScriptedTransport::always(status(429, "slow down")));
    let client = client(transport.clone(), RetryConfig::disabled());

    let err = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap_err();
    assert_eq!(err, BifrostError::RateLimited);
    assert_eq!(
        err.user_message(),
        "Too many requests. Please wait between translations."
    );
}

#[tokio::test(start_paused = true)]
async fn server_error_carries_status_and_message() {
    let body = r#"{"error": {"code": 500, "message": "internal failure"}}"#;
    let transport = Arc::new(ScriptedTransport::always(status(500, body)));
    let client = client(transport, RetryConfig::disabled());

    let err = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BifrostError::Http {
            status: 500,
            message: "internal failure".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn malformed_json_is_parse_error_and_retried() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ok("not json"),
        gemini_ok("fixed"),
    ]));
    let client = client(transport.clone(), retry(2, 10));

    let text = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap();
    assert_eq!(text, "fixed");
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn malformed_json_surfaces_as_parse() {
    let transport = Arc::new(ScriptedTransport::always(ok("<html>")));
    let client = client(transport, RetryConfig::disabled());

    let err = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap_err();
    assert!(matches!(err, BifrostError::Parse(_)));
}

#[tokio::test(start_paused = true)]
async fn empty_candidate_is_empty_response() {
    let transport = Arc::new(ScriptedTransport::always(ok(r#"{"candidates": []}"#)));
    let client = client(transport.clone(), retry(2, 10));

    let err = client
        .execute(&gemini(), &Payload::text("hi"), "key")
        .await
        .unwrap_err();
    assert_eq!(err, BifrostError::EmptyResponse);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unsupported_payload_never_reaches_transport() {
    let transport = Arc::new(ScriptedTransport::always(gemini_ok("unused")));
    let client = client(transport.clone(), retry(3, 10));
    let groq = OpenAiCompatibleAdapter::groq("llama-3.3-70b-versatile", GenerationParams::default());
    let payload = Payload::with_attachment(
        "transcribe",
        InlineData::from_bytes("audio/mpeg", b"ID3"),
    );

    let err = client.execute(&groq, &payload, "key").await.unwrap_err();

    assert!(matches!(err, BifrostError::UnsupportedContent(_)));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(client.limiter().count().await, 0);
}

// =========================================================================
// Interaction with the rate limiter
// =========================================================================

#[tokio::test(start_paused = true)]
async fn every_attempt_counts_against_rate_limit() {
    let transport = Arc::new(ScriptedTransport::always(connection_error()));
    let client = client(transport, retry(3, 10));

    let _ = client.execute(&gemini(), &Payload::text("hi"), "key").await;
    assert_eq!(client.limiter().count().await, 3);
}

#[tokio::test(start_paused = true)]
async fn retries_wait_for_rate_limit_window() {
    let transport = Arc::new(ScriptedTransport::always(connection_error()));
    let client = RequestClient::new(
        transport.clone(),
        &RateLimitConfig::new()
            .limit(1)
            .window(Duration::from_secs(10)),
        retry(2, 100),
    );
    let start = Instant::now();

    let _ = client.execute(&gemini(), &Payload::text("hi"), "key").await;

    let times = transport.call_times();
    assert_eq!(times.len(), 2);
    // Backoff of 200ms, then the limiter holds the retry until the window ends.
    assert_eq!(times[1].duration_since(start), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn request_targets_gemini_endpoint() {
    let transport = Arc::new(ScriptedTransport::always(gemini_ok("ok")));
    let client = client(transport.clone(), RetryConfig::disabled());

    client
        .execute(&gemini(), &Payload::text("hi"), "secret")
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert!(
        request
            .url
            .ends_with("/v1beta/models/gemini-2.0-flash:generateContent?key=secret")
    );
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
}
