//! Intent labels, the instruction prompt and the classifier.

mod classifier;
mod label;
pub mod prompt;

pub use classifier::{Classification, ClassificationFailure, IntentClassifier};
pub use label::{IntentDistribution, IntentLabel};
