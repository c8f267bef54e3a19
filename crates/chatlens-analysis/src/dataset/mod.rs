//! The in-memory conversational dataset and its queries.

mod loader;
pub mod statistics;

pub use loader::{DatasetFormat, fetch_default, read_frame, read_frame_blocking};
pub use statistics::{LanguageDistribution, NullStats, TOXICITY_KEYS, ToxicityDistribution};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::Serialize;

/// Summary returned by the dataset info query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub num_instances: usize,
    pub num_attributes: usize,
    pub lang_count: usize,
}

/// A loaded table and the name it was loaded under.
///
/// Immutable once built; a reload replaces the whole value.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    frame: DataFrame,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// No rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0 || self.frame.width() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
    }

    pub fn info(&self, config: &AnalysisConfig) -> Result<DatasetInfo> {
        Ok(DatasetInfo {
            name: self.name.clone(),
            num_instances: self.height(),
            num_attributes: self.width(),
            lang_count: self.language_count(config)?,
        })
    }

    /// Texts of user-authored rows in load order. Null texts become `""`.
    pub fn prompter_texts(&self, config: &AnalysisConfig) -> Result<Vec<String>> {
        let missing: Vec<String> = [&config.role_column, &config.text_column]
            .into_iter()
            .filter(|name| !self.has_column(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::MissingColumns(missing));
        }

        let roles = self.column(&config.role_column)?.cast(&DataType::String)?;
        let texts = self.column(&config.text_column)?.cast(&DataType::String)?;

        let prompter = config.prompter_role.as_str();
        Ok(roles
            .as_materialized_series()
            .str()?
            .into_iter()
            .zip(texts.as_materialized_series().str()?.into_iter())
            .filter(|(role, _)| *role == Some(prompter))
            .map(|(_, text)| text.unwrap_or_default().to_string())
            .collect())
    }

    pub fn language_count(&self, config: &AnalysisConfig) -> Result<usize> {
        statistics::distinct_count(self.column(&config.language_column)?)
    }

    pub fn language_distribution(&self, config: &AnalysisConfig) -> Result<LanguageDistribution> {
        statistics::value_distribution(self.column(&config.language_column)?)
    }

    pub fn null_stats(&self, column: &str) -> Result<NullStats> {
        Ok(statistics::null_stats(self.column(column)?, self.height()))
    }

    pub fn toxicity_distribution(&self, config: &AnalysisConfig) -> Result<ToxicityDistribution> {
        statistics::toxicity_distribution(
            self.column(&config.toxicity_column)?,
            config.toxicity_threshold,
        )
    }
}
