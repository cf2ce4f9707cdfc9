//! Sentiment and keyword analysis of feedback messages
//!
//! [`FeedbackAnalyzer`] puts the memo tables of [`AnalysisCache`] in front of the
//! uncached [`SentimentEngine`] and [`KeywordExtractor`]. The [`Aggregator`]
//! folds analyzed documents into collection-wide and per-service statistics.

pub mod aggregator;
pub mod cache;
pub mod keywords;
pub mod normalizer;
pub mod sentiment;

use std::sync::Arc;

use tracing::info;

pub use aggregator::Aggregator;
pub use cache::AnalysisCache;
pub use cache::CacheInfo;
pub use cache::CacheStats;
pub use cache::MemoCache;
pub use keywords::KeywordExtractor;
pub use keywords::DEFAULT_TOP_N;
pub use sentiment::LexiconModel;
pub use sentiment::PolarityModel;
pub use sentiment::SentimentEngine;

use crate::config::CacheConfig;
use crate::models::AnalyzedFeedback;
use crate::models::FeedbackDocument;
use crate::models::Keyword;
use crate::models::SentimentLabel;
use crate::models::SentimentResult;

/// Counts of loaded NLP resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCounts {
    pub stopwords: usize,
    pub lexicon_words: usize,
}

/// Load the stopword list and sentiment lexicon. Idempotent.
pub fn initialize() -> ResourceCounts {
    let counts = ResourceCounts {
        stopwords: normalizer::initialize(),
        lexicon_words: sentiment::initialize(),
    };
    info!(
        "NLP resources ready: {} stopwords, {} lexicon words",
        counts.stopwords, counts.lexicon_words
    );
    counts
}

/// Cached entry point for per-message analysis
pub struct FeedbackAnalyzer {
    engine: SentimentEngine,
    extractor: KeywordExtractor,
    cache: Arc<AnalysisCache>,
}

impl Default for FeedbackAnalyzer {
    fn default() -> Self {
        Self::new(SentimentEngine::default(), Arc::new(AnalysisCache::default()))
    }
}

impl FeedbackAnalyzer {
    pub fn new(engine: SentimentEngine, cache: Arc<AnalysisCache>) -> Self {
        Self {
            engine,
            extractor: KeywordExtractor::new(),
            cache,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            SentimentEngine::default(),
            Arc::new(AnalysisCache::from_config(config)),
        )
    }

    /// Analyzer without memoization; results are identical to the cached one
    pub fn uncached() -> Self {
        Self::new(SentimentEngine::default(), Arc::new(AnalysisCache::disabled()))
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn engine(&self) -> &SentimentEngine {
        &self.engine
    }

    pub fn sentiment_score(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.cache
            .scores
            .get_or_compute(text.to_string(), || self.engine.score(text))
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        if text.is_empty() {
            return SentimentLabel::Neutral;
        }
        self.cache
            .labels
            .get_or_compute(text.to_string(), || self.engine.classify(text))
    }

    pub fn sentiment(&self, text: &str) -> SentimentResult {
        SentimentResult {
            score: self.sentiment_score(text),
            label: self.classify(text),
        }
    }

    pub fn top_keywords(&self, text: &str, n: usize) -> Vec<Keyword> {
        if text.is_empty() || n == 0 {
            return Vec::new();
        }
        self.cache
            .keywords
            .get_or_compute((text.to_string(), n), || {
                self.extractor.top_keywords(text, n)
            })
    }

    /// Sentiment and top `n` keywords for one document
    pub fn analyze(&self, document: FeedbackDocument, n: usize) -> AnalyzedFeedback {
        let text = document.message_text();
        let sentiment = self.sentiment(text);
        let top_keywords = self.top_keywords(text, n);
        AnalyzedFeedback {
            document,
            sentiment,
            top_keywords,
        }
    }
}
