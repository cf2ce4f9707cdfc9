//! Text normalization shared by keyword extraction and sentiment scoring
//!
//! Keyword tokens are lowercase words with punctuation removed, at least three
//! characters long, and not in the English stopword list. Sentiment words keep
//! every word (apostrophes included) since negators and intensifiers matter there.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

// English stopword list, one word per line
const STOPWORD_LIST: &str = include_str!("../../data/stopwords.txt");

/// Tokens of this many characters or fewer are never keywords
pub const MIN_TOKEN_CHARS: usize = 3;

lazy_static! {
    static ref PUNCT_RGX: Regex = Regex::new(r"[^\w\s]").expect("static punctuation regex");
    static ref STOPWORDS: HashSet<&'static str> = STOPWORD_LIST
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
}

/// Force the stopword set and regex to load. Safe to call repeatedly.
pub fn initialize() -> usize {
    lazy_static::initialize(&PUNCT_RGX);
    lazy_static::initialize(&STOPWORDS);
    STOPWORDS.len()
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Keyword tokens in order of appearance
pub fn normalize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase();
    PUNCT_RGX
        .replace_all(&lowered, "")
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Every lowercase word, split on anything but letters, digits and apostrophes
pub fn sentiment_words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|word| word.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|word| !word.is_empty())
        .map(|word| word.replace('\u{2019}', "'").to_lowercase())
        .collect()
}
