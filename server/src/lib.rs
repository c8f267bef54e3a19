//! Chatlens HTTP service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  axum Router (TraceLayer, CorsLayer)                         │
//! │                                                              │
//! │   routes::dataset     upload / default corpus                │
//! │   routes::statistics  info, languages, nulls, toxicity       │
//! │   routes::intents     SSE stream, stop                       │
//! │          │                                                   │
//! │          ▼                                                   │
//! │   AppState { session, classifier, http }                     │
//! │          │                                                   │
//! │          ▼                                                   │
//! │   chatlens_analysis::AnalysisSession                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod state;

pub use config::ServerArgs;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer, upload_limit: usize) -> Router {
    routes::routes(upload_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
