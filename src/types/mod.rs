//! Public types for the Bifrost API.

mod generation;
mod payload;

pub use generation::GenerationParams;
pub use payload::{InlineData, Payload};
