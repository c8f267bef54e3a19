//! The closed set of intent labels and the per-run tally over them.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent assigned to a user-authored message.
///
/// Serialises to the exact wire names (`"Role-play"` keeps its hyphen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLabel {
    Summarization,
    Translation,
    Paraphrasing,
    #[serde(rename = "Role-play")]
    RolePlay,
    Miscellaneous,
}

impl IntentLabel {
    /// All labels in their canonical reporting order.
    pub const ALL: [IntentLabel; 5] = [
        IntentLabel::Summarization,
        IntentLabel::Translation,
        IntentLabel::Paraphrasing,
        IntentLabel::RolePlay,
        IntentLabel::Miscellaneous,
    ];

    /// Wire/display name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarization => "Summarization",
            Self::Translation => "Translation",
            Self::Paraphrasing => "Paraphrasing",
            Self::RolePlay => "Role-play",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// One-line description given to the model in the instruction prompt.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Summarization => "the user asks for a summary of a document or text",
            Self::Translation => "the user asks to translate text into another language",
            Self::Paraphrasing => "the user asks to rephrase or reword a sentence or text",
            Self::RolePlay => "the user asks to simulate a conversation or scenario",
            Self::Miscellaneous => "the query does not fall under any of the other categories",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Summarization => 0,
            Self::Translation => 1,
            Self::Paraphrasing => 2,
            Self::RolePlay => 3,
            Self::Miscellaneous => 4,
        }
    }

    /// Match raw model output against the label names.
    ///
    /// Leading and trailing whitespace is ignored, as are the characters
    /// `"`, `'`, `` ` ``, `[`, `]` and `.` at either end. The comparison is
    /// case-insensitive. Anything else yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '[' | ']' | '`' | '.'))
            .trim();

        Self::ALL
            .into_iter()
            .find(|label| cleaned.eq_ignore_ascii_case(label.as_str()))
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running count of labels seen during one stream run.
///
/// Every label is present from the start with a zero count. Serialises as a
/// JSON object keyed by label name, in [`IntentLabel::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntentDistribution {
    counts: [u64; 5],
}

impl IntentDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `label`.
    pub fn record(&mut self, label: IntentLabel) {
        self.counts[label.index()] += 1;
    }

    pub fn get(&self, label: IntentLabel) -> u64 {
        self.counts[label.index()]
    }

    /// Sum of all counts, equal to the number of recorded rows.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntentLabel, u64)> + '_ {
        IntentLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }
}

impl Serialize for IntentDistribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(IntentLabel::ALL.len()))?;
        for (label, count) in self.iter() {
            map.serialize_entry(label.as_str(), &count)?;
        }
        map.end()
    }
}
