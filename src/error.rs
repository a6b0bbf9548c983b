//! Bifrost error types

/// Bifrost error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BifrostError {
    // Configuration errors
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    #[error("no API key configured for provider: {0}")]
    MissingApiKey(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Input errors
    #[error("unsupported content: {0}")]
    UnsupportedContent(String),

    // Provider/network errors
    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("rate limited (HTTP 429)")]
    RateLimited,

    // Data errors
    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("empty response from provider")]
    EmptyResponse,
}

impl BifrostError {
    /// Whether this error is worth retrying.
    ///
    /// Network, HTTP, rate-limit and response-shape failures are transient.
    /// Configuration and input errors are returned immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BifrostError::Connection(_)
                | BifrostError::Http { .. }
                | BifrostError::RateLimited
                | BifrostError::Parse(_)
                | BifrostError::EmptyResponse
        )
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            BifrostError::RateLimited => {
                "Too many requests. Please wait between translations.".to_string()
            }
            other => format!("Translation failed: {other}"),
        }
    }
}

impl From<serde_json::Error> for BifrostError {
    fn from(err: serde_json::Error) -> Self {
        BifrostError::Parse(err.to_string())
    }
}

/// Result type alias for Bifrost operations
pub type Result<T> = std::result::Result<T, BifrostError>;
