//! The streaming intent-classification run.
//!
//! ```text
//!   Idle ──first poll──► Running ──rows exhausted──► Terminated(Exhausted)
//!                          │  ▲
//!              classify row│  │emit IntentProgress
//!                          ▼  │
//!                        Running ──token cancelled──► Terminated(Cancelled)
//! ```
//!
//! The run owns its texts and distribution. The token is checked before each
//! row and nowhere else; the classify call is the only await point.

use super::progress::{CancellationToken, IntentProgress, RunState, TerminationReason};
use crate::intent::{IntentClassifier, IntentDistribution};
use futures_util::StreamExt;
use futures_util::stream::{self, FusedStream};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A ready-to-run intent stream over a fixed list of prompter messages.
///
/// # Example
///
/// ```rust,ignore
/// use futures_util::StreamExt;
///
/// let run = IntentStream::new(texts, classifier, token);
/// let mut events = Box::pin(run.into_events());
/// while let Some(progress) = events.next().await {
///     println!("{}/{} {}", progress.processed_count, progress.total, progress.intent);
/// }
/// ```
pub struct IntentStream {
    texts: Vec<String>,
    classifier: Arc<IntentClassifier>,
    token: CancellationToken,
}

impl IntentStream {
    pub fn new(
        texts: Vec<String>,
        classifier: Arc<IntentClassifier>,
        token: CancellationToken,
    ) -> Self {
        Self {
            texts,
            classifier,
            token,
        }
    }

    /// Rows this run will process if not cancelled.
    pub fn total(&self) -> usize {
        self.texts.len()
    }

    /// Turn the run into a lazy stream of progress events, one per row.
    ///
    /// Nothing is classified until the stream is polled. Dropping the stream
    /// (e.g. a disconnected client) stops the run after the row in flight.
    /// Once terminated, the stream keeps yielding `None`.
    pub fn into_events(self) -> impl FusedStream<Item = IntentProgress> + Send + 'static {
        let cursor = RunCursor {
            total: self.texts.len(),
            texts: self.texts.into_iter(),
            classifier: self.classifier,
            token: self.token,
            state: RunState::Idle,
            started: Instant::now(),
            processed: 0,
            distribution: IntentDistribution::new(),
        };

        stream::unfold(cursor, |mut cursor| async move {
            let progress = cursor.advance().await?;
            Some((progress, cursor))
        })
        .fuse()
    }

    /// Drive the run to completion, collecting every event.
    pub async fn run_to_end(self) -> Vec<IntentProgress> {
        self.into_events().collect().await
    }
}

struct RunCursor {
    texts: std::vec::IntoIter<String>,
    total: usize,
    classifier: Arc<IntentClassifier>,
    token: CancellationToken,
    state: RunState,
    started: Instant,
    processed: usize,
    distribution: IntentDistribution,
}

impl RunCursor {
    async fn advance(&mut self) -> Option<IntentProgress> {
        if self.state.is_terminated() {
            return None;
        }
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            self.started = Instant::now();
            info!(
                total = self.total,
                provider = self.classifier.provider_name(),
                "Intent stream started"
            );
        }

        if self.token.is_cancelled() {
            self.finish(TerminationReason::Cancelled);
            return None;
        }

        let Some(text) = self.texts.next() else {
            self.finish(TerminationReason::Exhausted);
            return None;
        };

        let classification = self.classifier.classify(&text).await;
        self.processed += 1;
        self.distribution.record(classification.label);
        debug!("Processed: {} / {}", self.processed, self.total);

        Some(IntentProgress {
            text,
            intent: classification.label,
            processed_count: self.processed,
            total: self.total,
            elapsed_time: self.started.elapsed().as_secs_f64(),
            intent_distribution: self.distribution,
        })
    }

    fn finish(&mut self, reason: TerminationReason) {
        self.state = RunState::Terminated(reason);
        info!(
            processed = self.processed,
            total = self.total,
            state = self.state.display_name(),
            elapsed_secs = self.started.elapsed().as_secs_f64(),
            "Intent stream finished"
        );
    }
}
