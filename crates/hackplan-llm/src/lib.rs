pub mod gemini;
pub mod groq;
pub mod mock;
pub mod plan;
pub mod provider;

pub use provider::{LlmProvider, ProviderError};
