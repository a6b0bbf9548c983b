//! Shared test helpers: a scripted in-memory transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use bifrost::{BifrostError, HttpRequest, HttpResponse, Result, Transport};

/// Transport that replays a fixed script of responses and records each call.
///
/// Once the script is exhausted every further call gets `fallback`.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse>>>,
    fallback: Result<HttpResponse>,
    latency: Duration,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err(BifrostError::Connection("script exhausted".into())),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same response.
    pub fn always(response: Result<HttpResponse>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: response,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push((Instant::now(), request));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn ok(body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

pub fn status(code: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status: code,
        body: body.to_string(),
    })
}

pub fn connection_error() -> Result<HttpResponse> {
    Err(BifrostError::Connection("connection refused".into()))
}

/// A successful Gemini response carrying `text`.
pub fn gemini_ok(text: &str) -> Result<HttpResponse> {
    ok(&serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    })
    .to_string())
}
