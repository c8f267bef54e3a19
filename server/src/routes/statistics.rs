//! Read-only statistics over the live dataset.
//!
//! All of these reject a missing or empty dataset with `400`.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chatlens_analysis::{DatasetInfo, LanguageDistribution, NullStats, ToxicityDistribution};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LanguageDistributionResponse {
    pub language_distribution: LanguageDistribution,
}

#[derive(Debug, Serialize)]
pub struct ToxicityDistributionResponse {
    pub toxicity_distribution: ToxicityDistribution,
}

pub async fn dataset_info(State(state): State<AppState>) -> ApiResult<Json<DatasetInfo>> {
    Ok(Json(state.session.dataset_info()?))
}

pub async fn language_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<LanguageDistributionResponse>> {
    Ok(Json(LanguageDistributionResponse {
        language_distribution: state.session.language_distribution()?,
    }))
}

pub async fn lang_null_count(State(state): State<AppState>) -> ApiResult<Json<NullStats>> {
    Ok(Json(state.session.language_null_stats()?))
}

pub async fn toxicity_null_count(State(state): State<AppState>) -> ApiResult<Json<NullStats>> {
    Ok(Json(state.session.toxicity_null_stats()?))
}

pub async fn toxicity_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<ToxicityDistributionResponse>> {
    Ok(Json(ToxicityDistributionResponse {
        toxicity_distribution: state.session.toxicity_distribution()?,
    }))
}
