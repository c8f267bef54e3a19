//! Ollama provider implementation.
//!
//! Talks to a local Ollama server through its `/api/chat` endpoint with a
//! JSON-schema `format`, so the model is constrained to `{ "intent": ... }`.

use super::provider::{IntentProvider, ProviderError, extract_intent};
use crate::intent::prompt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model to use for intent classification.
const DEFAULT_MODEL: &str = "llama3.1";

/// Deterministic sampling; the label set is closed.
const DEFAULT_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    format: serde_json::Value,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<Message>,
}

/// Configuration for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// The model to use (e.g., "llama3.1", "mistral").
    pub model: String,
    /// Temperature for response generation.
    pub temperature: f32,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Server address, without the `/api/chat` path.
    pub base_url: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::default()
    }
}

/// Builder for [`OllamaConfig`].
#[derive(Default)]
pub struct OllamaConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OllamaConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> OllamaConfig {
        OllamaConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout_secs: self.timeout_secs,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Intent provider backed by an Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use chatlens_analysis::ai::{OllamaConfig, OllamaProvider};
///
/// let provider = OllamaProvider::with_config(
///     OllamaConfig::builder().model("llama3.1").build(),
/// )?;
/// ```
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
    system_prompt: String,
}

impl OllamaProvider {
    /// Create a provider with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a provider with custom configuration.
    pub fn with_config(config: OllamaConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self {
            config,
            client,
            system_prompt: prompt::system_prompt(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt::user_message(text),
                },
            ],
            stream: false,
            format: prompt::intent_schema(),
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        }
    }

    fn parse_response(body: &str) -> Result<String, ProviderError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = response
            .message
            .map(|message| message.content)
            .ok_or(ProviderError::EmptyResponse)?;

        extract_intent(&content)
    }
}

#[async_trait]
impl IntentProvider for OllamaProvider {
    async fn request_intent(&self, text: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&self.build_request(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_response(&body)
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}
