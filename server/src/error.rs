//! HTTP error mapping.
//!
//! Every failed request answers with a JSON body:
//!
//! ```json
//! { "code": "NO_DATA_LOADED", "detail": "No dataset is loaded. ..." }
//! ```
//!
//! Client errors (missing dataset, bad upload, missing columns) map to
//! `400 Bad Request`; everything else, including a failed default-dataset
//! download, maps to `500 Internal Server Error`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chatlens_analysis::AnalysisError;
use serde::Serialize;

/// Errors returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The multipart request was malformed or lacked the `file` field.
    #[error("{0}")]
    InvalidUpload(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Analysis(error) if error.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Analysis(error) => error.error_code(),
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
