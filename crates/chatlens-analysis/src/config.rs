//! Configuration types for dataset analysis.
//!
//! Column names, the prompter role value and the toxicity threshold are all
//! configurable; the defaults match the OpenAssistant conversation schema.

use serde::{Deserialize, Serialize};

/// Default download location of the OpenAssistant/oasst2 train split.
pub const DEFAULT_DATASET_URL: &str =
    "https://huggingface.co/api/datasets/OpenAssistant/oasst2/parquet/default/train/0.parquet";

/// Display name used for the default corpus.
pub const DEFAULT_DATASET_NAME: &str = "OpenAssistant/oasst2";

/// Scores below this value are counted as zero in toxicity averages.
pub const DEFAULT_TOXICITY_THRESHOLD: f64 = 0.01;

/// Configuration for the analysis library.
///
/// # Example
///
/// ```rust,ignore
/// use chatlens_analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .toxicity_threshold(0.05)
///     .language_column("language")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Column holding the message author role.
    /// Default: "role"
    pub role_column: String,

    /// Column holding the message body.
    /// Default: "text"
    pub text_column: String,

    /// Role value marking user-authored messages.
    /// Default: "prompter"
    pub prompter_role: String,

    /// Column holding the message language code.
    /// Default: "lang"
    pub language_column: String,

    /// Struct column holding detoxify scores.
    /// Default: "detoxify"
    pub toxicity_column: String,

    /// Scores below this value are zeroed before averaging (0.0 - 1.0).
    /// Default: 0.01
    pub toxicity_threshold: f64,

    /// Where the default corpus is downloaded from (parquet).
    pub default_dataset_url: String,

    /// Name reported for the default corpus.
    pub default_dataset_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            role_column: "role".to_string(),
            text_column: "text".to_string(),
            prompter_role: "prompter".to_string(),
            language_column: "lang".to_string(),
            toxicity_column: "detoxify".to_string(),
            toxicity_threshold: DEFAULT_TOXICITY_THRESHOLD,
            default_dataset_url: DEFAULT_DATASET_URL.to_string(),
            default_dataset_name: DEFAULT_DATASET_NAME.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.toxicity_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "toxicity_threshold".to_string(),
                value: self.toxicity_threshold,
            });
        }

        for (field, value) in [
            ("role_column", &self.role_column),
            ("text_column", &self.text_column),
            ("prompter_role", &self.prompter_role),
            ("language_column", &self.language_column),
            ("toxicity_column", &self.toxicity_column),
            ("default_dataset_url", &self.default_dataset_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyField(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Configuration field '{0}' must not be empty")]
    EmptyField(String),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    role_column: Option<String>,
    text_column: Option<String>,
    prompter_role: Option<String>,
    language_column: Option<String>,
    toxicity_column: Option<String>,
    toxicity_threshold: Option<f64>,
    default_dataset_url: Option<String>,
    default_dataset_name: Option<String>,
}

impl AnalysisConfigBuilder {
    pub fn role_column(mut self, column: impl Into<String>) -> Self {
        self.role_column = Some(column.into());
        self
    }

    pub fn text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = Some(column.into());
        self
    }

    /// Set the role value that marks user-authored rows.
    pub fn prompter_role(mut self, role: impl Into<String>) -> Self {
        self.prompter_role = Some(role.into());
        self
    }

    pub fn language_column(mut self, column: impl Into<String>) -> Self {
        self.language_column = Some(column.into());
        self
    }

    pub fn toxicity_column(mut self, column: impl Into<String>) -> Self {
        self.toxicity_column = Some(column.into());
        self
    }

    /// Set the threshold below which toxicity scores are zeroed.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0
    pub fn toxicity_threshold(mut self, threshold: f64) -> Self {
        self.toxicity_threshold = Some(threshold);
        self
    }

    /// Set the parquet URL fetched by `use-default-dataset`.
    pub fn default_dataset_url(mut self, url: impl Into<String>) -> Self {
        self.default_dataset_url = Some(url.into());
        self
    }

    pub fn default_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.default_dataset_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            role_column: self.role_column.unwrap_or(defaults.role_column),
            text_column: self.text_column.unwrap_or(defaults.text_column),
            prompter_role: self.prompter_role.unwrap_or(defaults.prompter_role),
            language_column: self.language_column.unwrap_or(defaults.language_column),
            toxicity_column: self.toxicity_column.unwrap_or(defaults.toxicity_column),
            toxicity_threshold: self
                .toxicity_threshold
                .unwrap_or(defaults.toxicity_threshold),
            default_dataset_url: self
                .default_dataset_url
                .unwrap_or(defaults.default_dataset_url),
            default_dataset_name: self
                .default_dataset_name
                .unwrap_or(defaults.default_dataset_name),
        };

        config.validate()?;
        Ok(config)
    }
}
