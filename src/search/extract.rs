//! Keyword extraction: weighted term-frequency maps from one file's text.
//!
//! Plain tokens contribute their occurrence count; declaration patterns
//! scanned over the original (un-normalized) text add structural weight on
//! top, so a file *defining* `UserService` outranks one merely mentioning it.

use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

/// Weight added per plain token occurrence.
const OCCURRENCE_WEIGHT: u32 = 1;
/// Weight added when a term is declared as a class.
const CLASS_DECL_WEIGHT: u32 = 10;
/// Weight added when a term appears as a function declaration or call name.
const FUNCTION_DECL_WEIGHT: u32 = 5;

/// Minimum token length for indexing. Tokens of one or two characters are
/// near-universal in source text and carry no relevance signal.
const MIN_TOKEN_LENGTH: usize = 3;

/// Fixed stoplist of common source-language keywords, excluded from indexing
/// and scoring as noise. Also keeps the `<name>(` declaration pattern from
/// crediting every `while (...)` or `switch (...)` statement.
pub(crate) const STOP_WORDS: &[&str] = &[
    "abstract", "and", "async", "await", "boolean", "break", "case", "catch", "class", "const",
    "continue", "default", "delete", "else", "enum", "export", "extends", "false", "final",
    "finally", "for", "from", "function", "implements", "import", "instanceof", "interface", "let",
    "new", "not", "null", "number", "private", "protected", "public", "return", "static", "string",
    "super", "switch", "the", "this", "throw", "true", "try", "typeof", "undefined", "var", "void",
    "while", "with", "yield",
];

static CLASS_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+([A-Za-z_][A-Za-z0-9_]*)").expect("class declaration pattern is valid")
});

static FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+([A-Za-z_][A-Za-z0-9_]*)|([A-Za-z_][A-Za-z0-9_]*)\s*\(")
        .expect("function declaration pattern is valid")
});

/// Derives the weighted term-frequency map for one file's text.
pub fn extract(text: &str) -> AHashMap<String, u32> {
    let mut terms = AHashMap::new();

    for token in tokenize(text) {
        *terms.entry(token).or_insert(0) += OCCURRENCE_WEIGHT;
    }

    // Structural boosts scan the original text, where declaration casing
    // and punctuation are still intact. They add on top of the plain count
    // for the same term.
    for caps in CLASS_DECL.captures_iter(text) {
        add_declaration(&mut terms, &caps[1], CLASS_DECL_WEIGHT);
    }
    for caps in FUNCTION_DECL.captures_iter(text) {
        let name = caps.get(1).or_else(|| caps.get(2));
        if let Some(name) = name {
            add_declaration(&mut terms, name.as_str(), FUNCTION_DECL_WEIGHT);
        }
    }

    terms
}

/// Normalizes and splits text into indexable tokens.
///
/// Lowercases, replaces every character that is not a letter, digit, or
/// whitespace with a space, then splits on whitespace and drops short or
/// stoplisted tokens. Queries go through the same path as file text so the
/// two sides always agree on token identity.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| keep_token(token))
        .map(str::to_string)
        .collect()
}

fn keep_token(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_LENGTH && !STOP_WORDS.contains(&token)
}

fn add_declaration(terms: &mut AHashMap<String, u32>, name: &str, weight: u32) {
    let name = name.to_lowercase();
    if keep_token(&name) {
        *terms.entry(name).or_insert(0) += weight;
    }
}
