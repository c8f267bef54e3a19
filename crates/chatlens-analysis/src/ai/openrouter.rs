//! OpenRouter provider implementation.
//!
//! Uses the OpenAI-compatible chat completions API at <https://openrouter.ai/>
//! with a `json_schema` response format, so any hosted model that supports
//! structured outputs can serve as the classifier.

use super::provider::{IntentProvider, ProviderError, extract_intent};
use crate::intent::prompt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter API endpoint.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model to use for intent classification.
const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

const DEFAULT_TEMPERATURE: f32 = 0.0;

/// A single label fits comfortably.
const DEFAULT_MAX_TOKENS: u32 = 50;

#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Model, sampling and transport settings for [`OpenRouterProvider`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// The model to use (e.g., "openai/gpt-4o-mini").
    pub model: String,
    /// Sampling temperature (0.0 - 2.0). Zero keeps labels deterministic.
    pub temperature: f32,
    /// Completion cap; a single-label JSON object needs very few.
    pub max_tokens: u32,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Full chat-completions URL. Point it at any OpenAI-compatible gateway.
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OpenRouterConfig {
    pub fn builder() -> OpenRouterConfigBuilder {
        OpenRouterConfigBuilder::default()
    }
}

/// Fluent builder; unset fields fall back to the defaults above.
#[derive(Default)]
pub struct OpenRouterConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OpenRouterConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Per-request timeout. Unset means no timeout.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> OpenRouterConfig {
        OpenRouterConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Intent provider backed by the OpenRouter API.
///
/// # Example
///
/// ```rust,ignore
/// use chatlens_analysis::ai::{OpenRouterConfig, OpenRouterProvider};
///
/// let config = OpenRouterConfig::builder()
///     .model("openai/gpt-4o-mini")
///     .timeout_secs(30)
///     .build();
/// let provider = OpenRouterProvider::with_config("your-api-key", config)?;
/// ```
pub struct OpenRouterProvider {
    api_key: String,
    config: OpenRouterConfig,
    client: Client,
    system_prompt: String,
}

impl OpenRouterProvider {
    /// Provider with the default model and no timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_config(api_key, OpenRouterConfig::default())
    }

    /// Create a new OpenRouter provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(
        api_key: impl Into<String>,
        config: OpenRouterConfig,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
            system_prompt: prompt::system_prompt(),
        })
    }

    fn build_request(&self, text: &str) -> OpenRouterRequest {
        OpenRouterRequest {
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
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: prompt::SCHEMA_NAME,
                    strict: true,
                    schema: prompt::intent_schema(),
                },
            },
        }
    }

    fn parse_response(body: &str) -> Result<String, ProviderError> {
        let result: OpenRouterResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = result
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .map(|message| message.content.as_str())
            .ok_or(ProviderError::EmptyResponse)?;

        extract_intent(content)
    }
}

#[async_trait]
impl IntentProvider for OpenRouterProvider {
    async fn request_intent(&self, text: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "chatlens")
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
        "OpenRouter"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"intent\":\"Role-play\"}"
                }
            }]
        }"#;
        assert_eq!(OpenRouterProvider::parse_response(body).unwrap(), "Role-play");
    }

    #[test]
    fn test_parse_response_with_empty_choices() {
        let result = OpenRouterProvider::parse_response(r#"{"choices": []}"#);
        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_with_null_choices() {
        let result = OpenRouterProvider::parse_response(r#"{"choices": null}"#);
        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_message_not_object() {
        let result =
            OpenRouterProvider::parse_response(r#"{"choices": [{"message": "not an object"}]}"#);
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_request_carries_schema_and_prompt() {
        let provider = OpenRouterProvider::new("test-key").unwrap();
        let request = serde_json::to_value(provider.build_request("Summarize this article")).unwrap();

        assert_eq!(request["response_format"]["type"], "json_schema");
        assert_eq!(
            request["response_format"]["json_schema"]["name"],
            "classify_user_intent"
        );
        assert_eq!(request["response_format"]["json_schema"]["strict"], true);
        assert_eq!(request["max_tokens"], 50);
        assert_eq!(
            request["messages"][1]["content"],
            "User question: Summarize this article"
        );
    }

    #[test]
    fn test_config_builder_custom_values() {
        let config = OpenRouterConfig::builder()
            .model("openai/gpt-4o-mini")
            .temperature(0.5)
            .max_tokens(20)
            .timeout_secs(60)
            .base_url("https://custom.api.com")
            .build();

        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 20);
        assert_eq!(config.timeout_secs, Some(60));
        assert_eq!(config.base_url, "https://custom.api.com");
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = OpenRouterProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "OpenRouter");
        assert_eq!(provider.model(), Some(DEFAULT_MODEL));
    }
}
