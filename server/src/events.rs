//! Server-sent event framing for the intent stream.
//!
//! ```text
//!   IntentStream ──► IntentProgress ──► Event { data: <json> } ──► client
//! ```
//!
//! Each progress value becomes one `data:` event with no event name, so a
//! browser `EventSource` receives it through `onmessage`.

use axum::response::sse::Event;
use chatlens_analysis::IntentProgress;
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;

/// Frame one progress value.
///
/// Serializing `IntentProgress` cannot fail; if it somehow does, the event is
/// sent as a comment so the stream stays well-formed.
pub fn progress_event(progress: &IntentProgress) -> Event {
    match Event::default().json_data(progress) {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(error = %error, "Failed to encode progress event");
            Event::default().comment("encode error")
        }
    }
}

/// Map a progress stream onto SSE events.
pub fn sse_events(
    progress: impl Stream<Item = IntentProgress> + Send + 'static,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    progress.map(|p| Ok(progress_event(&p)))
}
