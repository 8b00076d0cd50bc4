//! Request plumbing shared by the HTTP providers.
//!
//! Every provider sends one JSON body and reads one JSON reply. Status codes
//! are classified here so the retry policy in the quiz pipeline sees the same
//! [`ProviderError`] variants whichever backend answered.

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;

use lectern_core::traits::GenerateRequest;

use crate::error::ProviderError;

/// System prompt used when a request does not carry its own.
pub(crate) const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an experienced university educator. Follow the requested output format exactly.";

/// Retry delay assumed when a 429 response carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// One chat turn, borrowed from the request.
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(request: &'a GenerateRequest) -> Self {
        Self {
            role: "system",
            content: system_prompt(request),
        }
    }

    pub fn user(request: &'a GenerateRequest) -> Self {
        Self {
            role: "user",
            content: &request.prompt,
        }
    }
}

pub(crate) fn system_prompt(request: &GenerateRequest) -> &str {
    request
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Build the HTTP client for a provider.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))
}

/// Classify a failure to send a request.
pub(crate) fn send_error(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

/// Parse the `retry-after` header (in seconds) of a 429 response into milliseconds.
pub(crate) fn retry_after_ms(headers: &HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
        .saturating_mul(1000)
}

/// Map a failed status to the error the pipeline retries on (or not).
pub(crate) fn status_error(
    status: u16,
    headers: &HeaderMap,
    message: String,
    model: &str,
) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited {
            retry_after_ms: retry_after_ms(headers),
        },
        401 | 403 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError { status, message },
    }
}

/// Decode a successful JSON reply, or classify the failed one.
///
/// `error_message` pulls a readable message out of an error body; it gets the
/// raw body and returns `None` to keep it as is.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    model: &str,
    error_message: fn(&str) -> Option<String>,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or(body);
        return Err(status_error(status.as_u16(), &headers, message, model));
    }

    // Unparseable success bodies are reported with status 0.
    response.json().await.map_err(|e| ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    })
}

/// For APIs whose error bodies are not worth unpacking.
pub(crate) fn raw_body(_: &str) -> Option<String> {
    None
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
