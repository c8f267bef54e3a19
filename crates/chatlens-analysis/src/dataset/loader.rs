//! Parse uploaded bytes or the downloaded default corpus into a `DataFrame`.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Rows sampled for schema inference when reading CSV and JSON.
const INFER_SCHEMA_ROWS: usize = 1000;

/// On-disk formats a dataset can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    /// A JSON array of records.
    Json,
    /// Newline-delimited JSON records.
    JsonLines,
    Parquet,
}

impl DatasetFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }

    /// Format for a user upload. Only CSV and the JSON flavours are accepted.
    pub fn for_upload(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match Self::from_extension(extension) {
            Some(format @ (Self::Csv | Self::Json | Self::JsonLines)) => Ok(format),
            _ => Err(AnalysisError::UnsupportedFormat(if extension.is_empty() {
                filename.to_string()
            } else {
                extension.to_string()
            })),
        }
    }

    /// Format of a remote resource, judged by the URL path. Defaults to parquet.
    pub fn for_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::Parquet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::JsonLines => "jsonl",
            Self::Parquet => "parquet",
        }
    }
}

/// Parse a complete file held in memory.
///
/// This is CPU-bound; async callers should run it on a blocking thread.
pub fn read_frame(format: DatasetFormat, bytes: Vec<u8>) -> Result<DataFrame> {
    let size = bytes.len();
    let cursor = Cursor::new(bytes);

    let df = match format {
        DatasetFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(cursor)
            .finish()
            .context("Failed to parse CSV")?,
        DatasetFormat::Json => JsonReader::new(cursor)
            .with_json_format(JsonFormat::Json)
            .infer_schema_len(std::num::NonZeroUsize::new(INFER_SCHEMA_ROWS))
            .finish()
            .context("Failed to parse JSON")?,
        DatasetFormat::JsonLines => JsonReader::new(cursor)
            .with_json_format(JsonFormat::JsonLines)
            .infer_schema_len(std::num::NonZeroUsize::new(INFER_SCHEMA_ROWS))
            .finish()
            .context("Failed to parse JSON lines")?,
        DatasetFormat::Parquet => ParquetReader::new(cursor)
            .finish()
            .context("Failed to parse parquet")?,
    };

    debug!(
        format = format.as_str(),
        bytes = size,
        rows = df.height(),
        columns = df.width(),
        "Parsed dataset"
    );
    Ok(df)
}

/// Parse on the blocking pool so large files don't stall the runtime.
pub async fn read_frame_blocking(format: DatasetFormat, bytes: Vec<u8>) -> Result<DataFrame> {
    tokio::task::spawn_blocking(move || read_frame(format, bytes))
        .await
        .map_err(|e| AnalysisError::Io(std::io::Error::other(e)))?
}

/// Download and parse the default corpus.
///
/// Every failure on this path, network or parse, is reported as
/// [`AnalysisError::DatasetFetch`].
pub async fn fetch_default(client: &reqwest::Client, config: &AnalysisConfig) -> Result<DataFrame> {
    let url = &config.default_dataset_url;
    info!(url = %url, "Downloading default dataset");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AnalysisError::DatasetFetch(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AnalysisError::DatasetFetch(e.to_string()))?;

    read_frame_blocking(DatasetFormat::for_url(url), bytes.to_vec())
        .await
        .map_err(|e| AnalysisError::DatasetFetch(e.to_string()))
}
