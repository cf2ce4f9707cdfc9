//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the feedback analytics CLI

use crate::analysis::CacheInfo;
use crate::models::AnalyzedFeedback;
use crate::models::GlobalStats;
use crate::models::Keyword;
use crate::models::SentimentBreakdown;
use crate::models::SentimentResult;
use crate::models::ServiceStats;
use crate::models::WarmUpReport;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print collection-wide analysis
pub fn print_global_stats(stats: &GlobalStats, sentiment: &SentimentBreakdown) {
    println!("📊 Feedback Analysis");
    println!("====================");
    println!("  Total feedback: {}", stats.total_feedback);
    println!("  Average rating: {:.2}", stats.average_rating);
    println!();

    println!("🏷️  Feedback types:");
    if stats.feedback_type_counts.is_empty() {
        println!("  (none)");
    }
    for (feedback_type, count) in &stats.feedback_type_counts {
        println!("  {feedback_type:<20} {count:>6}");
    }
    println!();

    print_breakdown(sentiment);
}

/// Print the analysis of one service
pub fn print_service_stats(service: &str, stats: &ServiceStats) {
    println!("🔎 Service: {service}");
    println!("====================");
    println!("  Total feedback:    {}", stats.total_feedback);
    println!("  Average rating:    {:.2}", stats.average_rating);
    println!("  Average sentiment: {:+.2}", stats.average_sentiment);
    println!();

    print_breakdown(&stats.sentiment_breakdown);
    println!();

    if stats.top_keywords.is_empty() {
        println!("🔑 Top keywords: (none)");
    } else {
        println!("🔑 Top keywords: {}", stats.top_keywords.join(", "));
    }
}

fn print_breakdown(breakdown: &SentimentBreakdown) {
    println!("💬 Sentiment:");
    for (label, count) in breakdown.entries() {
        println!("  {:<20} {:>6}", label.as_str(), count);
    }
}

/// Print analyzed feedback documents
pub fn print_feedback_list(feedbacks: &[AnalyzedFeedback]) {
    println!("Found {} feedback documents:", feedbacks.len());
    for item in feedbacks {
        let doc = &item.document;
        println!(
            "  - {} | {} | {} | ★{} | {} ({:+.2})",
            doc.id,
            doc.service,
            doc.feedback_type,
            doc.rating,
            item.sentiment.label,
            item.sentiment.score
        );
        println!("      {}", truncate_str(doc.message_text(), 80));
        if !item.top_keywords.is_empty() {
            println!("      keywords: {}", format_keywords(&item.top_keywords));
        }
    }
}

/// Print the sentiment of ad-hoc text
pub fn print_sentiment(text: &str, result: &SentimentResult) {
    println!("💬 \"{}\"", truncate_str(text, 60));
    println!("  Score: {:+.2}", result.score);
    println!("  Label: {}", result.label);
}

pub fn print_keywords(keywords: &[Keyword]) {
    if keywords.is_empty() {
        println!("🔑 No keywords found");
        return;
    }
    println!("🔑 Top keywords:");
    for (rank, keyword) in keywords.iter().enumerate() {
        println!("  {:>2}. {:<20} {:>4}", rank + 1, keyword.word, keyword.frequency);
    }
}

fn format_keywords(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(|k| format!("{} ({})", k.word, k.frequency))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_warm_up_report(report: &WarmUpReport, cache: &CacheInfo) {
    match report {
        WarmUpReport::Success { processed_docs } => {
            print_success(&format!("Precomputed analysis for {processed_docs} documents"));
        }
        WarmUpReport::Error { error } => {
            print_error(&format!("Warm-up failed: {error}"));
        }
    }
    for table in &cache.tables {
        println!(
            "  {:<16} {:>6}/{:<6} entries ({:.1}%)",
            table.name,
            table.entries,
            table.capacity,
            table.usage_percentage()
        );
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 Feedback Analytics Configuration:");
    println!();

    println!("🗄️  Database:");
    println!("  URL: {}", mask_database_url(config.database_url()));
    println!("  Table: {}", config.table());
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🌐 Server:");
    println!("  Bind address: {}", config.bind_address());
    println!("  CORS: {}", config.server.enable_cors);
    println!("  CORS origins: {:?}", config.server.cors_origins);
    println!("  Slow request threshold: {}ms", config.server.slow_request_ms);
    println!();

    println!("⚡ Cache:");
    println!("  Enabled: {}", config.cache.enabled);
    println!("  Sentiment scores: {}", config.cache.sentiment_capacity);
    println!("  Sentiment labels: {}", config.cache.label_capacity);
    println!("  Keywords: {}", config.cache.keyword_capacity);
    println!();

    println!("🧠 Analysis:");
    println!("  Keywords per feedback: {}", config.analysis.default_top_n);
    println!("  Keywords harvested per message: {}", config.analysis.harvest_top_n);
    println!("  Keywords per service: {}", config.analysis.service_top_keywords);
    println!("  Warm up on start: {}", config.analysis.warm_up_on_start);
    println!("  Warm-up batch size: {}", config.analysis.warm_up_batch_size);
}

/// Mask database URL for logging (hide password)
fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return "***invalid***".to_string();
    };
    match rest.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => url.to_string(),
    }
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_respects_char_boundaries() {
        assert_eq!(truncate_str("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_str("short", 10), "short");
    }

    #[test]
    fn test_mask_database_url() {
        assert_eq!(
            mask_database_url("postgresql://admin:secret@db:5432/feedback"),
            "postgresql://admin:***@db:5432/feedback"
        );
        assert_eq!(
            mask_database_url("postgresql://localhost:5432/feedback"),
            "postgresql://localhost:5432/feedback"
        );
        assert_eq!(mask_database_url("not a url"), "***invalid***");
    }

    #[test]
    fn test_format_keywords() {
        let keywords = vec![Keyword::new("refund", 3), Keyword::new("late", 1)];
        assert_eq!(format_keywords(&keywords), "refund (3), late (1)");
    }
}
