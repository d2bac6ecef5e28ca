//! HCC code recognition in note text
//!
//! Matching is pluggable through [`CodeMatcher`]. The default
//! [`KeywordMatcher`] recognizes literal HCC tokens only; there is no NLP.

use raflift_common::db::{normalize_code, CoefficientEntry, CoefficientTable};
use regex::Regex;
use std::sync::LazyLock;

/// `HCC85`, `hcc 85`, `HCC-085`, `HCC1234`. Word-bounded on both sides so
/// `HCC1` is never found inside `HCC18`.
static HCC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bHCC[ -]?\d+\b").unwrap());

/// Finds the HCC code a note refers to
pub trait CodeMatcher: Send + Sync {
    /// First recognized code in `note_text` that exists in `table`
    fn find_code(&self, note_text: &str, table: &CoefficientTable) -> Option<CoefficientEntry>;
}

/// Keyword matcher over literal HCC tokens
///
/// Tokens are normalized to `HCC<digits>` (uppercase, leading zeros dropped)
/// and checked in reading order against the table's keys, normalized the
/// same way. The returned entry carries the key as stored. Tokens for codes
/// not in the table are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn new() -> Self {
        Self
    }

    /// All normalized HCC tokens in reading order, known or not
    pub fn tokens(note_text: &str) -> impl Iterator<Item = String> + '_ {
        HCC_TOKEN_RE
            .find_iter(note_text)
            .map(|m| normalize_code(m.as_str()))
    }
}

impl CodeMatcher for KeywordMatcher {
    fn find_code(&self, note_text: &str, table: &CoefficientTable) -> Option<CoefficientEntry> {
        Self::tokens(note_text).find_map(|code| table.get_normalized(&code))
    }
}
