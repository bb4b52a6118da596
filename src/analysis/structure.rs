//! Sentence-level heuristics. These produce advisories only: no replacement
//! text and no marker.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences with more words than this are flagged.
pub const LONG_SENTENCE_WORDS: usize = 40;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static PASSIVE_VOICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:is|was|were|been)\s+\w+ed\b").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub sentence: String,
    pub message: String,
}

pub fn advisories(text: &str) -> Vec<Advisory> {
    let mut found = Vec::new();

    for sentence in SENTENCE_END.split(text).map(str::trim).filter(|s| !s.is_empty()) {
        let words = sentence.split_whitespace().count();
        if words > LONG_SENTENCE_WORDS {
            found.push(Advisory {
                sentence: sentence.to_string(),
                message: format!("Consider breaking down long sentence ({} words)", words),
            });
        }
        if PASSIVE_VOICE.is_match(sentence) {
            found.push(Advisory {
                sentence: sentence.to_string(),
                message: "Consider using active voice for clarity".to_string(),
            });
        }
    }

    found
}
