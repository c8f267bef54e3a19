//! Column statistics over a loaded dataset.

use crate::error::{AnalysisError, Result, ResultExt};
use polars::prelude::*;
use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::HashMap;

/// Detoxify score names, in report order.
pub const TOXICITY_KEYS: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "identity_attack",
    "insult",
    "threat",
    "sexual_explicit",
];

/// Null count of one column and its share of all rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NullStats {
    pub null_count: usize,
    /// Fraction in 0.0 - 1.0, not a percentage.
    pub percentage: f64,
}

/// Value counts sorted by count descending, ties by value ascending.
///
/// Serialized as a JSON object whose key order is the sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageDistribution(Vec<(String, u64)>);

impl LanguageDistribution {
    fn from_counts(mut counts: Vec<(String, u64)>) -> Self {
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self(counts)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn get(&self, value: &str) -> Option<u64> {
        self.0.iter().find(|(v, _)| v == value).map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LanguageDistribution {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, count) in &self.0 {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

/// Thresholded mean of each detoxify score, in [`TOXICITY_KEYS`] order.
///
/// Empty when no row carries scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToxicityDistribution(Vec<(&'static str, f64)>);

impl ToxicityDistribution {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn entries(&self) -> &[(&'static str, f64)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ToxicityDistribution {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, mean) in &self.0 {
            map.serialize_entry(key, mean)?;
        }
        map.end()
    }
}

/// Distinct non-null values.
pub fn distinct_count(column: &Column) -> Result<usize> {
    let series = column.as_materialized_series().drop_nulls();
    if series.is_empty() {
        return Ok(0);
    }
    series
        .n_unique()
        .context(format!("Failed to count distinct values of '{}'", column.name()))
}

/// Count occurrences of each non-null value.
pub fn value_distribution(column: &Column) -> Result<LanguageDistribution> {
    let series = column.as_materialized_series().drop_nulls();
    if series.is_empty() {
        return Ok(LanguageDistribution::default());
    }

    let name = series.name().clone();
    let counts_df = series
        .value_counts(false, false, "count".into(), false)
        .context(format!("Failed to count values of '{}'", name))?;

    let values = counts_df.column(name.as_str())?.cast(&DataType::String)?;
    let counts = counts_df.column("count")?.cast(&DataType::UInt64)?;

    let counts = values
        .as_materialized_series()
        .str()?
        .into_iter()
        .zip(counts.as_materialized_series().u64()?.into_iter())
        .filter_map(|(value, count)| Some((value?.to_string(), count.unwrap_or(0))))
        .collect();

    Ok(LanguageDistribution::from_counts(counts))
}

/// Null count as a share of `total_rows`; 0.0 for an empty table.
pub fn null_stats(column: &Column, total_rows: usize) -> NullStats {
    let null_count = column.null_count();
    let percentage = if total_rows == 0 {
        0.0
    } else {
        null_count as f64 / total_rows as f64
    };
    NullStats {
        null_count,
        percentage,
    }
}

/// Per-row accumulation of thresholded scores.
#[derive(Default)]
struct ToxicityAccumulator {
    rows: usize,
    sums: [f64; TOXICITY_KEYS.len()],
}

impl ToxicityAccumulator {
    fn add(&mut self, key_index: usize, score: Option<f64>, threshold: f64) {
        if let Some(score) = score
            && score >= threshold
        {
            self.sums[key_index] += score;
        }
    }

    fn finish(self) -> ToxicityDistribution {
        if self.rows == 0 {
            return ToxicityDistribution::default();
        }
        let rows = self.rows as f64;
        ToxicityDistribution(
            TOXICITY_KEYS
                .iter()
                .zip(self.sums)
                .map(|(key, sum)| (*key, sum / rows))
                .collect(),
        )
    }
}

/// Average each detoxify score over rows with a non-null score object.
///
/// Missing or null scores and scores below `threshold` contribute zero.
/// Accepts a struct column (JSON and parquet inputs) or a string column of
/// JSON objects (CSV inputs).
pub fn toxicity_distribution(column: &Column, threshold: f64) -> Result<ToxicityDistribution> {
    let series = column.as_materialized_series();
    let accumulator = match series.dtype() {
        DataType::Struct(_) => accumulate_struct(series, threshold)?,
        DataType::String => accumulate_json_strings(series, threshold)?,
        DataType::Null => ToxicityAccumulator::default(),
        other => {
            return Err(AnalysisError::InvalidColumnType {
                column: series.name().to_string(),
                found: other.to_string(),
                expected: "struct or JSON object strings",
            });
        }
    };
    Ok(accumulator.finish())
}

fn accumulate_struct(series: &Series, threshold: f64) -> Result<ToxicityAccumulator> {
    let valid: Vec<bool> = series
        .is_not_null()
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect();

    let mut acc = ToxicityAccumulator {
        rows: valid.iter().filter(|v| **v).count(),
        ..Default::default()
    };

    let fields: HashMap<String, Series> = series
        .struct_()?
        .fields_as_series()
        .into_iter()
        .map(|field| (field.name().to_string(), field))
        .collect();

    for (index, key) in TOXICITY_KEYS.iter().enumerate() {
        let Some(field) = fields.get(*key) else {
            continue;
        };
        let scores = field.cast(&DataType::Float64)?;
        for (score, is_valid) in scores.f64()?.into_iter().zip(&valid) {
            if *is_valid {
                acc.add(index, score, threshold);
            }
        }
    }

    Ok(acc)
}

fn accumulate_json_strings(series: &Series, threshold: f64) -> Result<ToxicityAccumulator> {
    let mut acc = ToxicityAccumulator::default();

    for (row, raw) in series.str()?.into_iter().enumerate() {
        let Some(raw) = raw else {
            continue;
        };
        let scores: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(raw) {
            Ok(scores) => scores,
            Err(error) => {
                return Err(AnalysisError::from(error)
                    .with_context(format!("Malformed '{}' value in row {}", series.name(), row)));
            }
        };
        acc.rows += 1;
        for (index, key) in TOXICITY_KEYS.iter().enumerate() {
            acc.add(index, scores.get(*key).and_then(|v| v.as_f64()), threshold);
        }
    }

    Ok(acc)
}
