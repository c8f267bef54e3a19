//! Custom error types for dataset analysis.
//!
//! Errors carry a stable code so the HTTP layer can map them to a status
//! and a machine-readable body without matching on message text.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for dataset loading and analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No dataset has been loaded into the session.
    #[error("No dataset is loaded. Please upload a dataset or use the default dataset.")]
    NoDataLoaded,

    /// The loaded dataset has no rows or no columns.
    #[error("Dataset is not uploaded or is empty")]
    EmptyDataset,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The dataset lacks the columns an operation needs.
    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Column exists but holds values of the wrong shape.
    #[error("Column '{column}' has type {found}, expected {expected}")]
    InvalidColumnType {
        column: String,
        found: String,
        expected: &'static str,
    },

    /// Upload with an extension we cannot parse.
    #[error("Unsupported file format '{0}'. Please upload a CSV, JSON, or JSONL file.")]
    UnsupportedFormat(String),

    /// Fetching the default corpus failed.
    #[error("Failed to load the default dataset: {0}")]
    DatasetFetch(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for API consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::MissingColumns(_) => "MISSING_COLUMNS",
            Self::InvalidColumnType { .. } => "INVALID_COLUMN_TYPE",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::DatasetFetch(_) => "DATASET_FETCH_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the caller caused this error (bad input, missing precondition).
    ///
    /// Parse failures count as client errors: they come from the uploaded
    /// bytes, not from the service.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NoDataLoaded
            | Self::EmptyDataset
            | Self::ColumnNotFound(_)
            | Self::MissingColumns(_)
            | Self::InvalidColumnType { .. }
            | Self::UnsupportedFormat(_)
            | Self::Polars(_)
            | Self::Json(_) => true,
            Self::WithContext { source, .. } => source.is_client_error(),
            _ => false,
        }
    }
}

/// Errors serialize as `{code, detail}`.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("detail", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
