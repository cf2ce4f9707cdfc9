//! Frequency-ranked keyword extraction

use std::collections::HashMap;

use super::normalizer::normalize;
use crate::models::Keyword;

/// Keywords returned when the caller does not ask for a specific count
pub const DEFAULT_TOP_N: usize = 5;

/// Count occurrences, keeping tokens in order of first appearance
pub(crate) fn count_in_order<I, S>(tokens: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        if let Some(&idx) = positions.get(token) {
            counts[idx].1 += 1;
        } else {
            positions.insert(token.to_string(), counts.len());
            counts.push((token.to_string(), 1));
        }
    }
    counts
}

/// The `n` most frequent entries; equal counts keep first-appearance order
pub(crate) fn most_common(mut counts: Vec<(String, usize)>, n: usize) -> Vec<(String, usize)> {
    // stable sort
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub const fn new() -> Self {
        Self
    }

    /// Top `n` keywords of `text`, most frequent first
    pub fn top_keywords(&self, text: &str, n: usize) -> Vec<Keyword> {
        if n == 0 || text.trim().is_empty() {
            return Vec::new();
        }
        most_common(count_in_order(normalize(text)), n)
            .into_iter()
            .map(|(word, frequency)| Keyword { word, frequency })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_keywords_cat_example() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.top_keywords("the cat sat on the mat the cat ran", 2);
        assert_eq!(keywords, vec![Keyword::new("cat", 2), Keyword::new("sat", 1)]);
    }

    #[test]
    fn test_full_ranking_with_ties() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.top_keywords("the cat sat on the mat the cat ran", 10);
        assert_eq!(
            keywords,
            vec![
                Keyword::new("cat", 2),
                Keyword::new("sat", 1),
                Keyword::new("mat", 1),
                Keyword::new("ran", 1),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let extractor = KeywordExtractor::new();
        assert!(extractor.top_keywords("", DEFAULT_TOP_N).is_empty());
        assert!(extractor.top_keywords("   ", DEFAULT_TOP_N).is_empty());
        assert!(extractor.top_keywords("the and of", DEFAULT_TOP_N).is_empty());
        assert!(extractor.top_keywords("checkout checkout", 0).is_empty());
    }

    #[test]
    fn test_case_and_punctuation_merge() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.top_keywords("Refund! refund? REFUND, please.", 5);
        assert_eq!(keywords, vec![Keyword::new("refund", 3), Keyword::new("please", 1)]);
    }

    #[test]
    fn test_most_common_is_stable() {
        let counts = count_in_order(["b", "a", "b", "c", "a", "d"]);
        assert_eq!(
            most_common(counts, 3),
            vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
    }
}
