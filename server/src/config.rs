//! Command-line and environment configuration for the server.
//!
//! Every flag has an environment fallback; a `.env` file in the working
//! directory is loaded before parsing.

use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, Method};
use chatlens_analysis::ai::{
    IntentProvider, OllamaConfig, OllamaProvider, OpenRouterConfig, OpenRouterProvider,
};
use chatlens_analysis::config::{DEFAULT_DATASET_URL, DEFAULT_TOXICITY_THRESHOLD};
use chatlens_analysis::AnalysisConfig;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Which language model backend classifies intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// OpenRouter hosted models (needs OPENROUTER_API_KEY)
    Openrouter,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Conversational dataset analysis service",
    long_about = "HTTP service that loads a conversational dataset, reports statistics\n\
                  about it and streams LLM intent classification of its user messages.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENROUTER_API_KEY    API key for OpenRouter (required with --provider openrouter)\n  \
                  RUST_LOG              Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Local Ollama with llama3.1\n  \
                  chatlens\n\n  \
                  # OpenRouter on a custom port\n  \
                  chatlens --provider openrouter --port 9000"
)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "CHATLENS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CHATLENS_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CHATLENS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Intent classification backend
    #[arg(long, env = "CHATLENS_PROVIDER", value_enum, default_value_t = ProviderKind::Ollama)]
    pub provider: ProviderKind,

    /// Model name; defaults to the provider's default
    #[arg(short, long, env = "CHATLENS_MODEL")]
    pub model: Option<String>,

    /// Provider base URL; defaults to the provider's public endpoint
    #[arg(long, env = "CHATLENS_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// API key for OpenRouter
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for each classification request, in seconds. No timeout if unset.
    #[arg(long, env = "CHATLENS_REQUEST_TIMEOUT")]
    pub request_timeout_secs: Option<u64>,

    /// Allowed CORS origins, comma separated
    #[arg(
        long,
        env = "CHATLENS_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:4200"
    )]
    pub cors_origins: Vec<String>,

    /// Parquet URL loaded by /use-default-dataset/
    #[arg(long, env = "CHATLENS_DEFAULT_DATASET_URL", default_value = DEFAULT_DATASET_URL)]
    pub default_dataset_url: String,

    /// Toxicity scores below this value count as zero (0.0 - 1.0)
    #[arg(long, env = "CHATLENS_TOXICITY_THRESHOLD", default_value_t = DEFAULT_TOXICITY_THRESHOLD)]
    pub toxicity_threshold: f64,

    /// Maximum upload size in megabytes
    #[arg(long, env = "CHATLENS_MAX_UPLOAD_MB", default_value_t = 512)]
    pub max_upload_mb: usize,
}

impl ServerArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    pub fn upload_limit_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        AnalysisConfig::builder()
            .default_dataset_url(self.default_dataset_url.clone())
            .toxicity_threshold(self.toxicity_threshold)
            .build()
            .context("Invalid analysis configuration")
    }

    pub fn build_provider(&self) -> Result<Arc<dyn IntentProvider>> {
        match self.provider {
            ProviderKind::Ollama => {
                let mut config = OllamaConfig::builder();
                if let Some(model) = &self.model {
                    config = config.model(model.clone());
                }
                if let Some(url) = &self.provider_url {
                    config = config.base_url(url.clone());
                }
                if let Some(secs) = self.request_timeout_secs {
                    config = config.timeout_secs(secs);
                }
                Ok(Arc::new(OllamaProvider::with_config(config.build())?))
            }
            ProviderKind::Openrouter => {
                let Some(api_key) = self.api_key.clone().filter(|k| !k.trim().is_empty()) else {
                    bail!("OPENROUTER_API_KEY must be set to use the openrouter provider");
                };
                let mut config = OpenRouterConfig::builder();
                if let Some(model) = &self.model {
                    config = config.model(model.clone());
                }
                if let Some(url) = &self.provider_url {
                    config = config.base_url(url.clone());
                }
                if let Some(secs) = self.request_timeout_secs {
                    config = config.timeout_secs(secs);
                }
                Ok(Arc::new(OpenRouterProvider::with_config(
                    api_key,
                    config.build(),
                )?))
            }
        }
    }

    pub fn cors_layer(&self) -> Result<CorsLayer> {
        cors_layer(&self.cors_origins)
    }
}

/// CORS for the given origins, with credentials and any method or header.
///
/// Credentials rule out wildcards, so methods and headers mirror the request.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}
