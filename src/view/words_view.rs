//! Adapter for the word-cloud / occurrence view over a submitted text.

use crate::quali::{analyze, bar_entries, cloud_words, CloudWord, FrequencyEntry};
use serde::Serialize;

/// Outcome of analyzing one submitted text. "Nothing analyzable" is a
/// dedicated empty state, distinct from both errors and a pending
/// analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WordsModel {
    NoContent {
        message: String,
    },
    Analyzed {
        stats: String,
        cloud: Vec<CloudWord>,
        occurrences: Vec<FrequencyEntry>,
    },
}

pub fn derive(text: &str) -> WordsModel {
    let analysis = analyze(text);
    if analysis.is_empty() {
        return WordsModel::NoContent {
            message: "Add some text (at least a few words).".to_string(),
        };
    }

    WordsModel::Analyzed {
        stats: format!(
            "{} tokens retained — {} unique terms",
            analysis.token_count,
            analysis.entries.len()
        ),
        cloud: cloud_words(&analysis.entries),
        occurrences: bar_entries(&analysis.entries),
    }
}
