//! Provider trait for the single model round-trip behind intent classification.
//!
//! A provider sends one chat request carrying the fixed instruction prompt and
//! the structured-output schema, and returns the model's raw intent string.
//! Mapping that string onto an [`IntentLabel`](crate::IntentLabel) is the
//! classifier's job, so providers never need to know the label set.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/`
//! 2. Implement [`IntentProvider`] for the provider struct
//! 3. Export it from `src/ai/mod.rs`

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Why a provider could not produce an intent string.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The model endpoint could not be reached.
    #[error("Model endpoint unavailable: {0}")]
    Unavailable(String),

    /// The request exceeded the configured timeout.
    #[error("Model request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("Model API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body or its structured content could not be parsed.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// The response carried no content at all.
    #[error("Model returned no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::MalformedResponse(error.to_string())
        } else {
            Self::Unavailable(error.to_string())
        }
    }
}

/// A language model backend able to answer one intent request.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// stream run in the process.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    /// Ask the model for the intent of `text` and return its raw answer.
    ///
    /// One call is exactly one round-trip. Implementations must not retry.
    async fn request_intent(&self, text: &str) -> Result<String, ProviderError>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    fn model(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct StructuredIntent {
    intent: Option<String>,
}

/// Pull the intent out of structured model content.
///
/// Content that is a JSON object must carry a string `intent` field. Content
/// that is not JSON at all is passed through trimmed, since some models
/// answer with the bare label even when asked for JSON.
pub(crate) fn extract_intent(content: &str) -> Result<String, ProviderError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    if !trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let structured: StructuredIntent = serde_json::from_str(trimmed)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    structured
        .intent
        .ok_or_else(|| ProviderError::MalformedResponse("missing 'intent' field".to_string()))
}
