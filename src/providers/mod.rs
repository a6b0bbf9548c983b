//! Provider adapters and lookup.
//!
//! Each backend implements [`ProviderAdapter`]; [`ProviderRegistry`]
//! dispatches on the configured provider identifier.

pub mod gemini;
pub mod openai_compat;
pub mod registry;
pub mod traits;

pub use gemini::GeminiAdapter;
pub use openai_compat::OpenAiCompatibleAdapter;
pub use registry::{ProviderEntry, ProviderKind, ProviderRegistry};
pub use traits::ProviderAdapter;
