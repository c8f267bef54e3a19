//! Streaming intent classification and its stop control.

use crate::error::ApiResult;
use crate::events::sse_events;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::sse::Sse;
use serde_json::{Value, json};
use std::sync::Arc;

/// `GET /classify-intents/`: one SSE event per prompter message.
///
/// Preconditions are checked before the response starts, so a missing
/// dataset is a plain `400` rather than an empty stream. Dropping the
/// connection drops the stream and no further rows are classified.
pub async fn classify_intents(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let run = state
        .session
        .open_intent_stream(Arc::clone(&state.classifier))?;
    tracing::info!(total = run.total(), "Opening intent stream");
    Ok(Sse::new(sse_events(run.into_events())))
}

/// `POST /stop-stream/`: stop in-flight runs before their next row.
pub async fn stop_stream(State(state): State<AppState>) -> Json<Value> {
    state.session.stop_stream();
    Json(json!({ "message": "Stream stopped" }))
}
