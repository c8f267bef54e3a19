//! Shared state handed to every route handler.

use chatlens_analysis::{AnalysisSession, IntentClassifier};
use std::sync::Arc;

/// Application state, cloned cheaply into each request.
///
/// # Fields
///
/// * `session` - The live dataset and the stream stop control
/// * `classifier` - Intent classifier shared by all stream runs
/// * `http` - Client used to download the default dataset
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AnalysisSession>,
    pub classifier: Arc<IntentClassifier>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(session: AnalysisSession, classifier: IntentClassifier) -> Self {
        Self {
            session: Arc::new(session),
            classifier: Arc::new(classifier),
            http: reqwest::Client::new(),
        }
    }
}
