//! Bifrost - cached, rate-limited translation through generative AI APIs
//!
//! This crate provides a [`TranslationService`] that translates text,
//! images and audio/video through a remote model provider (Gemini or any
//! OpenAI-compatible endpoint such as Groq). Results are memoized in three
//! bounded LRU caches with time-based expiry, and outbound requests go
//! through a fixed-window rate limiter and an exponential-backoff retry loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use bifrost::{TranslationMode, TranslationService};
//!
//! #[tokio::main]
//! async fn main() -> bifrost::Result<()> {
//!     let service = TranslationService::builder()
//!         .provider("gemini")
//!         .gemini("your-api-key")
//!         .target_language("French")
//!         .build()?;
//!
//!     let text = service
//!         .translate_text("Good morning", TranslationMode::Quick)
//!         .await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`cache`]: generic LRU + TTL cache and key derivation
//! - [`limiter`]: fixed-window rate limiter
//! - [`providers`]: per-backend wire formats behind [`ProviderAdapter`]
//! - [`client`]: [`RequestClient`]: limiter + retry + adapter + [`Transport`]
//! - [`service`]: [`TranslationService`]: caches in front of the client

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod limiter;
pub mod providers;
pub mod service;
pub mod telemetry;
pub mod transport;
pub mod types;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types at crate root
pub use cache::{CacheConfig, ContentHash, LruCache, TextKey};
pub use client::{RequestClient, RetryConfig};
pub use config::Config;
pub use error::{BifrostError, Result};
pub use limiter::{RateLimitConfig, RateLimiter};
pub use providers::{
    GeminiAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderKind, ProviderRegistry,
};
pub use service::{
    ContentRequest, ContentType, TranslationMode, TranslationService, TranslationServiceBuilder,
    TranslationSettings,
};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::{GenerationParams, InlineData, Payload};
