//! Dual-mode query scoring over a directory index.
//!
//! The mode is decided once per call, uniformly for the whole directory:
//! [`ScoreMode::Prebuilt`] as soon as any record carries a populated term
//! map, [`ScoreMode::Fallback`] otherwise. Fallback re-scans raw text and
//! compensates for the missing structural weights with flat boosts.

use regex::{Regex, RegexBuilder};

use super::extract;
use super::index::DirectoryIndex;

/// Score contributed per unit of term weight on an exact token match.
const TERM_MATCH_WEIGHT: f64 = 0.01;
/// Score per unit of term weight when the token is a proper substring of an
/// indexed term (query "email" against indexed "emailservice").
const PARTIAL_MATCH_WEIGHT: f64 = 0.005;
/// Flat boost when a class declaration contains the token.
const CLASS_BOOST: f64 = 0.30;
/// Flat boost when a function declaration or call contains the token.
const FUNCTION_BOOST: f64 = 0.20;
/// Flat boost when the token appears inside a comment fragment.
const COMMENT_BOOST: f64 = 0.10;

/// How a query is scored against one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// Score against the precomputed term-frequency maps.
    Prebuilt,
    /// Re-scan raw file text; used when no term maps exist.
    Fallback,
}

impl ScoreMode {
    /// Picks the mode for a whole directory.
    pub fn for_index(index: &DirectoryIndex) -> Self {
        if index.records.iter().any(|record| !record.terms.is_empty()) {
            Self::Prebuilt
        } else {
            Self::Fallback
        }
    }
}

/// A positive relevance score for one record of the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredFile {
    /// Position of the file in the index's record list.
    pub record: usize,
    pub score: f64,
}

/// Scores every file in `index` against `query`.
///
/// Files scoring exactly zero are omitted. A query with no surviving tokens
/// yields an empty result, not an error. Results come back in record order;
/// ranking is the caller's concern.
pub fn score(query: &str, index: &DirectoryIndex) -> Vec<ScoredFile> {
    let tokens = extract::tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mode = ScoreMode::for_index(index);
    let mut scored = Vec::new();

    match mode {
        ScoreMode::Prebuilt => {
            for (record, file) in index.records.iter().enumerate() {
                let score = prebuilt_score(&tokens, file);
                if score > 0.0 {
                    scored.push(ScoredFile { record, score });
                }
            }
        }
        ScoreMode::Fallback => {
            let patterns: Vec<FallbackPatterns> =
                tokens.iter().map(|token| FallbackPatterns::new(token)).collect();
            for (record, file) in index.records.iter().enumerate() {
                let score = fallback_score(&tokens, &patterns, &file.text);
                if score > 0.0 {
                    scored.push(ScoredFile { record, score });
                }
            }
        }
    }

    scored
}

fn prebuilt_score(tokens: &[String], file: &super::index::FileRecord) -> f64 {
    let mut total = 0.0;
    for token in tokens {
        if let Some(weight) = file.terms.get(token) {
            total += f64::from(*weight) * TERM_MATCH_WEIGHT;
        }
        for (term, weight) in &file.terms {
            // Proper substrings only; the exact term already scored above.
            if term != token && term.contains(token.as_str()) {
                total += f64::from(*weight) * PARTIAL_MATCH_WEIGHT;
            }
        }
    }
    total
}

fn fallback_score(tokens: &[String], patterns: &[FallbackPatterns], text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let mut total = 0.0;

    for (token, boosts) in tokens.iter().zip(patterns) {
        let occurrences = lowered.matches(token.as_str()).count();
        total += occurrences as f64 * TERM_MATCH_WEIGHT;

        // Each flat boost applies at most once per token per file.
        if boosts.class_decl.as_ref().is_some_and(|re| re.is_match(text)) {
            total += CLASS_BOOST;
        }
        if boosts.function_decl.as_ref().is_some_and(|re| re.is_match(text)) {
            total += FUNCTION_BOOST;
        }
        if boosts.comment.as_ref().is_some_and(|re| re.is_match(text)) {
            total += COMMENT_BOOST;
        }
    }

    total
}

/// Case-insensitive structural patterns for one query token, compiled once
/// per scoring call.
struct FallbackPatterns {
    class_decl: Option<Regex>,
    function_decl: Option<Regex>,
    comment: Option<Regex>,
}

impl FallbackPatterns {
    fn new(token: &str) -> Self {
        let token = regex::escape(token);
        Self {
            class_decl: case_insensitive(&format!(r"class\s+\w*{token}\w*")),
            function_decl: case_insensitive(&format!(
                r"function\s+\w*{token}\w*|\w*{token}\w*\s*\("
            )),
            // The block alternative must stop at `*/`, otherwise any earlier
            // comment in the file would credit a token that only occurs in code.
            comment: case_insensitive(&format!(
                r"//[^\n]*{token}|/\*[^*]*(?:\*[^/][^*]*)*{token}"
            )),
        }
    }
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!("Failed to compile boost pattern {:?}: {}", pattern, err);
            None
        }
    }
}
