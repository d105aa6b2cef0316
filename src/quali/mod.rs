//! Free-text analysis: normalization, tokenization, stopword filtering
//! and term-frequency counting, plus the sizing scales the word-cloud and
//! occurrence-bar views consume.

mod stopwords;

pub use stopwords::is_stopword;

use serde::Serialize;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this are discarded.
const MIN_TOKEN_LEN: usize = 3;

/// Lowercase, strip diacritics, drop anything outside letters, digits,
/// apostrophes and hyphens, and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and split into retained tokens: trimmed of edge apostrophes
/// and hyphens, at least three characters, not a stopword.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .map(|w| w.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .filter(|w| !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// One term and how often it occurred in the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub word: String,
    pub count: usize,
}

/// Count term occurrences, sorted descending by count with ties in
/// first-seen order.
pub fn word_frequencies(tokens: &[String]) -> Vec<FrequencyEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for token in tokens {
        let entry = counts.entry(token).or_insert(0);
        if *entry == 0 {
            order.push(token);
        }
        *entry += 1;
    }

    let mut entries: Vec<FrequencyEntry> = order
        .into_iter()
        .map(|word| FrequencyEntry {
            word: word.to_string(),
            count: counts[word],
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// A full analysis pass over one text.
#[derive(Debug, Clone, Serialize)]
pub struct TextAnalysis {
    /// Retained token count, before deduplication.
    pub token_count: usize,
    pub entries: Vec<FrequencyEntry>,
}

impl TextAnalysis {
    /// True when there was nothing analyzable: empty input or nothing but
    /// stopwords and short tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic: identical input always yields identical output.
pub fn analyze(text: &str) -> TextAnalysis {
    let tokens = tokenize(text);
    let entries = word_frequencies(&tokens);
    TextAnalysis {
        token_count: tokens.len(),
        entries,
    }
}

/// How many terms the word cloud shows.
const CLOUD_TERMS: usize = 80;
/// How many terms the occurrence bars show.
const BAR_TERMS: usize = 20;

const MIN_FONT: f64 = 12.0;
const MAX_FONT: f64 = 64.0;

/// A cloud word with its font size, linearly scaled from count 1..=max
/// into [12, 64].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudWord {
    pub word: String,
    pub count: usize,
    pub size: f64,
}

/// Top terms sized for the word cloud.
pub fn cloud_words(entries: &[FrequencyEntry]) -> Vec<CloudWord> {
    let top = &entries[..entries.len().min(CLOUD_TERMS)];
    let max = top.first().map(|e| e.count).unwrap_or(1).max(1) as f64;
    top.iter()
        .map(|e| {
            let size = if max <= 1.0 {
                // Degenerate domain: every term occurred once.
                (MIN_FONT + MAX_FONT) / 2.0
            } else {
                MIN_FONT + (e.count as f64 - 1.0) / (max - 1.0) * (MAX_FONT - MIN_FONT)
            };
            CloudWord {
                word: e.word.clone(),
                count: e.count,
                size,
            }
        })
        .collect()
}

/// Top terms for the occurrence bars, highest count first.
pub fn bar_entries(entries: &[FrequencyEntry]) -> Vec<FrequencyEntry> {
    entries[..entries.len().min(BAR_TERMS)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics_and_noise() {
        assert_eq!(normalize_text("Été, déjà-vu!"), "ete deja-vu");
        assert_eq!(normalize_text("  lots   of\tspace "), "lots of space");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_tokenize_trims_edge_punctuation() {
        assert_eq!(tokenize("'chat- -chien'"), vec!["chat", "chien"]);
    }

    #[test]
    fn test_tokenize_drops_short_and_stopwords() {
        let tokens = tokenize("Le chat et le chien");
        assert_eq!(tokens, vec!["chat", "chien"]);
    }

    #[test]
    fn test_word_frequencies_sorted_with_stable_ties() {
        let tokens: Vec<String> = ["rouge", "bleu", "rouge", "vert"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let freqs = word_frequencies(&tokens);
        assert_eq!(freqs[0].word, "rouge");
        assert_eq!(freqs[0].count, 2);
        // Ties keep first-seen order.
        assert_eq!(freqs[1].word, "bleu");
        assert_eq!(freqs[2].word, "vert");
    }

    #[test]
    fn test_analyze_scenario_le_chat() {
        let analysis = analyze("Le chat et le chien");
        assert_eq!(analysis.token_count, 2);
        assert_eq!(
            analysis.entries,
            vec![
                FrequencyEntry {
                    word: "chat".into(),
                    count: 1
                },
                FrequencyEntry {
                    word: "chien".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_analyze_empty_and_all_stopwords() {
        assert!(analyze("").is_empty());
        assert!(analyze("le la et ou").is_empty());
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let text = "La peinture, la peinture et encore la peinture moderne";
        assert_eq!(analyze(text).entries, analyze(text).entries);
    }

    #[test]
    fn test_no_stopword_or_short_token_ever_appears() {
        let analysis = analyze("un tres grand chat est sur le toit du monde moderne");
        for entry in &analysis.entries {
            assert!(entry.word.chars().count() >= 3);
            assert!(!is_stopword(&entry.word));
        }
    }

    #[test]
    fn test_cloud_words_scaling() {
        let entries = vec![
            FrequencyEntry {
                word: "max".into(),
                count: 5,
            },
            FrequencyEntry {
                word: "min".into(),
                count: 1,
            },
        ];
        let cloud = cloud_words(&entries);
        assert_eq!(cloud[0].size, 64.0);
        assert_eq!(cloud[1].size, 12.0);
    }

    #[test]
    fn test_bar_entries_capped_at_twenty() {
        let entries: Vec<FrequencyEntry> = (0..30)
            .map(|i| FrequencyEntry {
                word: format!("w{}", i),
                count: 30 - i,
            })
            .collect();
        assert_eq!(bar_entries(&entries).len(), 20);
    }
}
