//! Intent classifier: one provider round-trip per message, never failing.

use super::IntentLabel;
use crate::ai::{IntentProvider, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Why a message fell back to `Miscellaneous` instead of a model-chosen label.
#[derive(Debug, Error)]
pub enum ClassificationFailure {
    /// The provider did not produce an answer.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The model answered with something outside the label set.
    #[error("Model returned unrecognized intent '{0}'")]
    UnrecognizedLabel(String),
}

/// Outcome of classifying one message.
///
/// `label` is always usable; `failure` records why it is a fallback, if it is.
#[derive(Debug)]
pub struct Classification {
    pub label: IntentLabel,
    pub failure: Option<ClassificationFailure>,
}

impl Classification {
    fn resolved(label: IntentLabel) -> Self {
        Self {
            label,
            failure: None,
        }
    }

    fn fallback(failure: ClassificationFailure) -> Self {
        Self {
            label: IntentLabel::Miscellaneous,
            failure: Some(failure),
        }
    }

    /// Whether the label is the `Miscellaneous` fallback for a failure.
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Classifies user messages into [`IntentLabel`]s through an [`IntentProvider`].
///
/// No batching, caching or retries: each call is exactly one provider request,
/// and the first failure settles that message as `Miscellaneous`.
pub struct IntentClassifier {
    provider: Arc<dyn IntentProvider>,
}

static_assertions::assert_impl_all!(IntentClassifier: Send, Sync);

impl IntentClassifier {
    pub fn new(provider: Arc<dyn IntentProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.model()
    }

    /// Classify one message.
    pub async fn classify(&self, text: &str) -> Classification {
        let failure = match self.provider.request_intent(text).await {
            Ok(raw) => match IntentLabel::parse(&raw) {
                Some(label) => return Classification::resolved(label),
                None => ClassificationFailure::UnrecognizedLabel(raw),
            },
            Err(error) => ClassificationFailure::Provider(error),
        };

        warn!(
            provider = self.provider.name(),
            error = %failure,
            "Intent classification failed, using Miscellaneous"
        );
        Classification::fallback(failure)
    }
}
