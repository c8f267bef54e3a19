//! Streaming intent classification over prompter messages.

mod progress;
mod stream;

pub use progress::{CancellationToken, IntentProgress, RunState, TerminationReason};
pub use stream::IntentStream;
