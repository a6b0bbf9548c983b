//! Provider adapter trait.
//!
//! An adapter describes how to address one backend: where to send the
//! request, which headers to attach, how to shape the JSON body and how to
//! pull the generated text back out of the response. Adapters are immutable
//! configuration plus pure functions, so the
//! [`RequestClient`](crate::RequestClient) can stay provider-agnostic and
//! switching providers is just switching which adapter it is handed.
//!
//! # Example
//!
//! ```ignore
//! let request = adapter.build_request(&Payload::text("Bonjour"), api_key)?;
//! let response = transport.send(request).await?;
//! let json: serde_json::Value = serde_json::from_str(&response.body)?;
//! let text = adapter.parse_response(&json)?;
//! ```

use crate::Result;
use crate::transport::HttpRequest;
use crate::types::Payload;

/// Wire-format description of a single backend.
pub trait ProviderAdapter: Send + Sync {
    /// Provider identifier for logging/metrics (e.g. "gemini").
    fn name(&self) -> &str;

    /// Model identifier the adapter targets.
    fn model(&self) -> &str;

    /// Full request URL.
    fn build_endpoint(&self, api_key: &str) -> String;

    /// Request headers.
    fn build_headers(&self, api_key: &str) -> Vec<(String, String)>;

    /// JSON request body, including generation parameters.
    ///
    /// Returns `UnsupportedContent` if the backend cannot accept the
    /// payload's attachment type.
    fn build_body(&self, payload: &Payload) -> Result<serde_json::Value>;

    /// Extract generated text from a decoded response.
    ///
    /// Returns `EmptyResponse` if none of the known response shapes carry
    /// non-empty text.
    fn parse_response(&self, body: &serde_json::Value) -> Result<String>;

    /// Assemble the complete HTTP request for a payload.
    fn build_request(&self, payload: &Payload, api_key: &str) -> Result<HttpRequest> {
        let body = self.build_body(payload)?;
        Ok(HttpRequest::post_json(
            self.build_endpoint(api_key),
            self.build_headers(api_key),
            &body,
        ))
    }
}

/// `Content-Type: application/json`.
pub(crate) fn json_content_type() -> (String, String) {
    ("Content-Type".to_string(), "application/json".to_string())
}
