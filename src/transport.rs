//! HTTP transport capability.
//!
//! The request client never talks to the network directly; it hands a fully
//! built [`HttpRequest`] to a [`Transport`] and gets back a status code and
//! body. [`ReqwestTransport`] is the production implementation. Tests inject
//! their own.

use std::time::Duration;

use async_trait::async_trait;

use crate::{BifrostError, Result};

/// Default per-request timeout for [`ReqwestTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A POST request with a JSON body.
    pub fn post_json(
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        body: &serde_json::Value,
    ) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers,
            body: Some(body.to_string()),
        }
    }
}

/// Raw response: any status code is a successful transport round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a single HTTP request.
///
/// Implementations return `Err(BifrostError::Connection)` only when no HTTP
/// response was obtained; non-2xx statuses are returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BifrostError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(connection_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(connection_error)?;

        Ok(HttpResponse { status, body })
    }
}

/// Drops the URL: Gemini carries the API key in its query string.
fn connection_error(err: reqwest::Error) -> BifrostError {
    BifrostError::Connection(err.without_url().to_string())
}
