//! Dataset loading routes.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use serde_json::{Value, json};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub filename: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Chat Dataset Analysis App!" }))
}

/// `POST /upload-dataset/`: replace the live dataset with an uploaded file.
pub async fn upload_dataset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(format!("Error uploading dataset: {}", e.body_text())))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidUpload("Uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::InvalidUpload(format!("Error uploading dataset: {}", e.body_text()))
        })?;

        state
            .session
            .load_upload(&filename, bytes.to_vec())
            .await
            .map_err(|e| e.with_context("Error uploading dataset"))?;

        return Ok(Json(UploadResponse {
            message: "Dataset uploaded successfully",
            filename,
        }));
    }

    Err(ApiError::InvalidUpload(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// `GET /use-default-dataset/`: download and load the default corpus.
pub async fn use_default_dataset(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.session.load_default(&state.http).await?;
    Ok(Json(json!({ "message": "Default dataset loaded successfully" })))
}
