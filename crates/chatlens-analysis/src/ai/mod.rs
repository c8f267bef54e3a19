//! Language model providers for intent classification.
//!
//! The module is built around the [`IntentProvider`] trait. Concrete
//! implementations:
//!
//! - [`OllamaProvider`] - local Ollama server (default, `llama3.1`)
//! - [`OpenRouterProvider`] - OpenRouter hosted models
//!
//! # Example
//!
//! ```rust,ignore
//! use chatlens_analysis::ai::OllamaProvider;
//! use chatlens_analysis::IntentClassifier;
//! use std::sync::Arc;
//!
//! let classifier = IntentClassifier::new(Arc::new(OllamaProvider::new()?));
//! let classification = classifier.classify("Translate this to French").await;
//! ```

mod ollama;
mod openrouter;
mod provider;

pub use ollama::{OllamaConfig, OllamaConfigBuilder, OllamaProvider};
pub use openrouter::{OpenRouterConfig, OpenRouterConfigBuilder, OpenRouterProvider};
pub use provider::{IntentProvider, ProviderError};
