//! Progress events, run states and cancellation for intent stream runs.
//!
//! A run emits one [`IntentProgress`] per classified message. Stopping is
//! cooperative: the run checks its [`CancellationToken`] before each row, so
//! a classification already in flight completes and is still reported.

use crate::intent::{IntentDistribution, IntentLabel};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a run stopped emitting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every prompter row was classified.
    Exhausted,
    /// A stop request was observed between rows.
    Cancelled,
}

/// Lifecycle of one stream run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum RunState {
    /// Created, no row pulled yet.
    Idle,
    /// Iterating rows.
    Running,
    /// Finished; no further events will be produced.
    Terminated(TerminationReason),
}

impl RunState {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Terminated(TerminationReason::Exhausted) => "Complete",
            Self::Terminated(TerminationReason::Cancelled) => "Cancelled",
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

/// One classified message, as pushed to the client.
#[derive(Debug, Clone, Serialize)]
pub struct IntentProgress {
    /// The message text that was classified.
    pub text: String,

    /// Resolved label; always one of the five.
    pub intent: IntentLabel,

    /// Rows processed so far in this run, starting at 1.
    pub processed_count: usize,

    /// Prompter rows in the dataset when the run started.
    pub total: usize,

    /// Seconds since the run started.
    pub elapsed_time: f64,

    /// Distribution snapshot including this row.
    pub intent_distribution: IntentDistribution,
}

/// Token for stopping a running intent stream.
///
/// Clones share one atomic flag, so the session can hand one clone to each
/// run and keep another for the stop endpoint.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(IntentProgress: Send, Sync);

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request that every run holding a clone stops before its next row.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel()`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
