//! Polarity scoring and three-way sentiment classification
//!
//! The engine is model-agnostic: anything implementing [`PolarityModel`] can
//! back it. The bundled [`LexiconModel`] scores text against an AFINN-style
//! word list (-5..+5) with simple negation and intensifier handling.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::warn;

use super::normalizer::sentiment_words;
use crate::models::round2;
use crate::models::SentimentLabel;
use crate::models::SentimentResult;
use crate::AnalyticsError;
use crate::Result;

// Load AFINN-style sentiment lexicon at compile time
const AFINN_LEXICON: &str = include_str!("../../data/afinn.txt");

/// Negators flip and dampen sentiment words this many words ahead
const NEGATION_SCOPE: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;
const MAX_VALENCE: f64 = 5.0;

const NEGATORS: [&str; 22] = [
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "cant", "don't", "dont", "doesn't", "didn't", "isn't", "wasn't", "aren't", "won't",
    "wouldn't", "hardly", "without",
];

lazy_static! {
    /// AFINN sentiment scores (-5 to +5)
    static ref AFINN_SCORES: HashMap<String, i8> = parse_lexicon(AFINN_LEXICON);

    static ref INTENSIFIERS: HashMap<&'static str, f64> = [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.2),
        ("too", 1.2),
        ("absolutely", 1.3),
        ("extremely", 1.5),
        ("incredibly", 1.5),
        ("totally", 1.3),
        ("completely", 1.3),
        ("super", 1.3),
        ("quite", 1.1),
        ("highly", 1.3),
        ("slightly", 0.7),
        ("somewhat", 0.8),
    ]
    .into_iter()
    .collect();
}

fn parse_lexicon(source: &str) -> HashMap<String, i8> {
    let mut map = HashMap::new();
    for line in source.lines() {
        if let Some((word, score_str)) = line.split_once('\t') {
            if let Ok(score) = score_str.trim().parse::<i8>() {
                map.insert(word.to_lowercase(), score);
            }
        }
    }
    map
}

/// Force the lexicon to load; returns the number of scored words
pub fn initialize() -> usize {
    lazy_static::initialize(&INTENSIFIERS);
    AFINN_SCORES.len()
}

/// Raw polarity source behind the engine
pub trait PolarityModel: Send + Sync {
    /// Polarity of non-empty text; any value outside [-1, 1] is clamped by the engine
    fn polarity(&self, text: &str) -> Result<f64>;

    fn name(&self) -> &str;
}

/// Rule-based model over the bundled AFINN lexicon
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconModel;

impl PolarityModel for LexiconModel {
    fn polarity(&self, text: &str) -> Result<f64> {
        let mut contributions = Vec::new();
        let mut boost = 1.0;
        let mut negation_left = 0usize;

        for word in sentiment_words(text) {
            if NEGATORS.contains(&word.as_str()) {
                negation_left = NEGATION_SCOPE;
                boost = 1.0;
                continue;
            }
            if let Some(factor) = INTENSIFIERS.get(word.as_str()) {
                boost *= factor;
                continue;
            }
            match AFINN_SCORES.get(&word) {
                Some(&valence) => {
                    let mut value = f64::from(valence) / MAX_VALENCE * boost;
                    if negation_left > 0 {
                        value *= NEGATION_FACTOR;
                    }
                    contributions.push(value);
                    negation_left = 0;
                }
                None => {
                    negation_left = negation_left.saturating_sub(1);
                }
            }
            boost = 1.0;
        }

        if contributions.is_empty() {
            return Ok(0.0);
        }
        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        if mean.is_finite() {
            Ok(mean)
        } else {
            Err(AnalyticsError::Compute(format!(
                "non-finite polarity for {} words",
                contributions.len()
            )))
        }
    }

    fn name(&self) -> &str {
        "afinn-lexicon"
    }
}

/// Uncached sentiment scoring on top of a polarity model
#[derive(Clone)]
pub struct SentimentEngine {
    model: Arc<dyn PolarityModel>,
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new(Arc::new(LexiconModel))
    }
}

impl std::fmt::Debug for SentimentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentEngine")
            .field("model", &self.model.name())
            .finish()
    }
}

impl SentimentEngine {
    pub fn new(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    /// Rounded, clamped polarity or the model's failure. Empty text is 0.0.
    pub fn evaluate(&self, text: &str) -> Result<f64> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        let raw = self.model.polarity(text)?;
        if !raw.is_finite() {
            return Err(AnalyticsError::Compute(format!(
                "{} returned {raw}",
                self.model.name()
            )));
        }
        Ok(round2(raw.clamp(-1.0, 1.0)))
    }

    /// Polarity in [-1, 1]; failures are logged and score 0.0
    pub fn score(&self, text: &str) -> f64 {
        match self.evaluate(text) {
            Ok(score) => score,
            Err(e) => {
                warn!("Sentiment scoring failed, defaulting to neutral: {}", e);
                0.0
            }
        }
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        SentimentLabel::from_score(self.score(text))
    }

    pub fn analyze(&self, text: &str) -> SentimentResult {
        SentimentResult::from_score(self.score(text))
    }
}
