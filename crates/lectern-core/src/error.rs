//! Error types.
//!
//! `ProviderError` lives here rather than in `lectern-providers` so the quiz
//! pipeline can downcast and classify provider failures for retry decisions
//! without string matching.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` for transient failures: rate limits, timeouts, network
    /// errors and 5xx (or 408) responses. Other 4xx responses will fail the
    /// same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. }
            | ProviderError::Timeout(_)
            | ProviderError::NetworkError(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500 || *status == 408,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_) => false,
        }
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Rejections from the batch answer analyzer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Questions and answers are paired by position, so the counts must agree.
    #[error("Number of questions and answers must match ({questions} questions, {answers} answers)")]
    LengthMismatch { questions: usize, answers: usize },
}

/// Failures of a question source. All of them are recoverable by falling
/// back to the static question bank.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No question source is configured.
    #[error("no question generator is configured")]
    Unavailable,

    /// The upstream provider call failed (after retries).
    #[error("question generation failed: {0:#}")]
    Provider(#[source] anyhow::Error),

    /// The upstream output was not a JSON array of questions.
    #[error("could not parse questions from generator output: {0}")]
    MalformedOutput(String),
}
