//! Conversational Dataset Analysis Library
//!
//! Statistics over a loaded chat corpus and streaming intent classification
//! of its user messages, built on Polars and an LLM provider.
//!
//! # Overview
//!
//! - **Dataset loading**: CSV, JSON and JSONL uploads, or the default
//!   OpenAssistant/oasst2 parquet split
//! - **Statistics**: language counts and distribution, null shares, averaged
//!   detoxify scores
//! - **Intent classification**: one model call per message, resolved to one of
//!   five fixed labels and never failing
//! - **Streaming**: a lazy per-row event stream with cooperative cancellation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use chatlens_analysis::{AnalysisSession, IntentClassifier};
//! use chatlens_analysis::ai::OllamaProvider;
//! use futures_util::StreamExt;
//! use std::sync::Arc;
//!
//! let session = AnalysisSession::default();
//! session.load_upload("chats.csv", std::fs::read("chats.csv")?).await?;
//! println!("{:?}", session.dataset_info()?);
//!
//! let classifier = Arc::new(IntentClassifier::new(Arc::new(OllamaProvider::new()?)));
//! let mut events = Box::pin(session.open_intent_stream(classifier)?.into_events());
//! while let Some(progress) = events.next().await {
//!     println!("[{}/{}] {}", progress.processed_count, progress.total, progress.intent);
//! }
//! ```
//!
//! # Providers
//!
//! Providers implement [`ai::IntentProvider`]:
//!
//! - [`ai::OllamaProvider`] - local Ollama server
//! - [`ai::OpenRouterProvider`] - OpenRouter API

pub mod ai;
pub mod config;
pub mod dataset;
pub mod error;
pub mod intent;
pub mod pipeline;
pub mod session;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use dataset::{
    Dataset, DatasetFormat, DatasetInfo, LanguageDistribution, NullStats, TOXICITY_KEYS,
    ToxicityDistribution,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use intent::{
    Classification, ClassificationFailure, IntentClassifier, IntentDistribution, IntentLabel,
};
pub use pipeline::{CancellationToken, IntentProgress, IntentStream, RunState, TerminationReason};
pub use session::AnalysisSession;
