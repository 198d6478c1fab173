//! Generative model provider abstraction.
//!
//! The analysis flow only needs a single unary text completion, so the seam
//! is one trait with a Gemini implementation and a scripted mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiTextProvider};
pub use mock::MockTextProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Result of a completed generation.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub finish_reason: FinishReason,
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a completion for `prompt`. No retry is attempted.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logs and metrics.
    fn model(&self) -> &str;
}
