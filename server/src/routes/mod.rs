//! Route table.
//!
//! # Routes
//!
//! | Method | Path                       | Handler                              |
//! |--------|----------------------------|--------------------------------------|
//! | GET    | `/`                        | [`dataset::root`]                    |
//! | POST   | `/upload-dataset/`         | [`dataset::upload_dataset`]          |
//! | GET    | `/use-default-dataset/`    | [`dataset::use_default_dataset`]     |
//! | GET    | `/dataset-info/`           | [`statistics::dataset_info`]         |
//! | GET    | `/language-distribution/`  | [`statistics::language_distribution`]|
//! | GET    | `/lang-null-count/`        | [`statistics::lang_null_count`]      |
//! | GET    | `/toxicity-null-count/`    | [`statistics::toxicity_null_count`]  |
//! | GET    | `/toxicity-distribution/`  | [`statistics::toxicity_distribution`]|
//! | GET    | `/classify-intents/`       | [`intents::classify_intents`]        |
//! | POST   | `/stop-stream/`            | [`intents::stop_stream`]             |

pub mod dataset;
pub mod intents;
pub mod statistics;

use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

/// All routes, with the upload route accepting bodies up to `upload_limit` bytes.
pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(dataset::root))
        .route(
            "/upload-dataset/",
            post(dataset::upload_dataset).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/use-default-dataset/", get(dataset::use_default_dataset))
        .route("/dataset-info/", get(statistics::dataset_info))
        .route(
            "/language-distribution/",
            get(statistics::language_distribution),
        )
        .route("/lang-null-count/", get(statistics::lang_null_count))
        .route("/toxicity-null-count/", get(statistics::toxicity_null_count))
        .route(
            "/toxicity-distribution/",
            get(statistics::toxicity_distribution),
        )
        .route("/classify-intents/", get(intents::classify_intents))
        .route("/stop-stream/", post(intents::stop_stream))
}
