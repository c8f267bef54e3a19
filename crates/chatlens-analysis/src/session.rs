//! Analysis session: the live dataset and the stream stop control.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      AnalysisSession                         │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │  config: AnalysisConfig      │  stream_token: RwLock         │
//! │  (column names, threshold)   │  ┌─────────────────────────┐  │
//! │                              │  │ CancellationToken       │  │
//! │  dataset: RwLock             │  │ cloned into every run,  │  │
//! │  ┌────────────────────────┐  │  │ replaced once cancelled │  │
//! │  │ Option<Arc<Dataset>>   │  │  └─────────────────────────┘  │
//! │  └────────────────────────┘  │                               │
//! └──────────────────────────────┴───────────────────────────────┘
//! ```
//!
//! Locks are `parking_lot` and are only held to swap or clone an `Arc`, never
//! across an await. Queries and runs work on the snapshot they took.

use crate::config::AnalysisConfig;
use crate::dataset::{
    Dataset, DatasetFormat, DatasetInfo, LanguageDistribution, NullStats, ToxicityDistribution,
    fetch_default, read_frame_blocking,
};
use crate::error::{AnalysisError, Result};
use crate::intent::IntentClassifier;
use crate::pipeline::{CancellationToken, IntentStream};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

pub struct AnalysisSession {
    config: AnalysisConfig,
    dataset: RwLock<Option<Arc<Dataset>>>,
    stream_token: RwLock<CancellationToken>,
}

static_assertions::assert_impl_all!(AnalysisSession: Send, Sync);

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            dataset: RwLock::new(None),
            stream_token: RwLock::new(CancellationToken::new()),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Install a dataset, replacing whatever was loaded.
    pub fn replace_dataset(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        info!(
            name = dataset.name(),
            rows = dataset.height(),
            columns = dataset.width(),
            "Dataset loaded"
        );
        *self.dataset.write() = Some(Arc::clone(&dataset));
        dataset
    }

    /// Snapshot of the live dataset.
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        self.dataset.read().clone().ok_or(AnalysisError::NoDataLoaded)
    }

    /// Snapshot of the live dataset, rejecting an empty one.
    pub fn non_empty_dataset(&self) -> Result<Arc<Dataset>> {
        let dataset = self.dataset()?;
        if dataset.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }
        Ok(dataset)
    }

    /// Parse an uploaded file and make it the live dataset.
    ///
    /// On failure the previous dataset stays loaded.
    pub async fn load_upload(&self, filename: &str, bytes: Vec<u8>) -> Result<Arc<Dataset>> {
        let format = DatasetFormat::for_upload(filename)?;
        let frame = read_frame_blocking(format, bytes).await?;
        Ok(self.replace_dataset(Dataset::new(filename, frame)))
    }

    /// Download the default corpus and make it the live dataset.
    pub async fn load_default(&self, client: &reqwest::Client) -> Result<Arc<Dataset>> {
        let frame = fetch_default(client, &self.config).await?;
        Ok(self.replace_dataset(Dataset::new(
            self.config.default_dataset_name.clone(),
            frame,
        )))
    }

    pub fn dataset_info(&self) -> Result<DatasetInfo> {
        self.non_empty_dataset()?.info(&self.config)
    }

    pub fn language_distribution(&self) -> Result<LanguageDistribution> {
        self.non_empty_dataset()?.language_distribution(&self.config)
    }

    pub fn language_null_stats(&self) -> Result<NullStats> {
        self.non_empty_dataset()?
            .null_stats(&self.config.language_column)
    }

    pub fn toxicity_null_stats(&self) -> Result<NullStats> {
        self.non_empty_dataset()?
            .null_stats(&self.config.toxicity_column)
    }

    pub fn toxicity_distribution(&self) -> Result<ToxicityDistribution> {
        self.non_empty_dataset()?.toxicity_distribution(&self.config)
    }

    /// Token for a run that is about to start.
    ///
    /// A token that was already cancelled is replaced, so a stop only affects
    /// the runs that were in flight when it was issued.
    pub fn begin_stream(&self) -> CancellationToken {
        let mut token = self.stream_token.write();
        if token.is_cancelled() {
            *token = CancellationToken::new();
        }
        token.clone()
    }

    /// Ask every in-flight run to stop before its next row.
    pub fn stop_stream(&self) {
        self.stream_token.read().cancel();
        info!("Intent stream stop requested");
    }

    /// Validate preconditions and prepare a classification run.
    ///
    /// Fails before any row is touched when no usable dataset is loaded or
    /// the role/text columns are missing.
    pub fn open_intent_stream(&self, classifier: Arc<IntentClassifier>) -> Result<IntentStream> {
        let dataset = self.non_empty_dataset()?;
        let texts = dataset.prompter_texts(&self.config)?;
        Ok(IntentStream::new(texts, classifier, self.begin_stream()))
    }
}
