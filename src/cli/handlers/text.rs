//! Ad-hoc text analysis handlers

use crate::analysis::KeywordExtractor;
use crate::analysis::SentimentEngine;
use crate::cli::output::print_keywords;
use crate::cli::output::print_sentiment;
use crate::models::SentimentResult;
use crate::Result;

pub fn handle_sentiment_command(text: &str) -> Result<()> {
    let engine = SentimentEngine::default();
    // model failures are reported here, not defaulted to neutral
    let score = engine.evaluate(text)?;
    print_sentiment(text, &SentimentResult::from_score(score));
    Ok(())
}

pub fn handle_keywords_command(text: &str, top: usize) -> Result<()> {
    let keywords = KeywordExtractor::new().top_keywords(text, top);
    print_keywords(&keywords);
    Ok(())
}
