//! Store-backed analytics handlers

use crate::analysis::Aggregator;
use crate::cli::output::*;
use crate::models::AnalyzedFeedback;
use crate::store::FeedbackStore;
use crate::Result;

pub async fn handle_analysis_command(
    store: &dyn FeedbackStore,
    aggregator: &Aggregator,
    json: bool,
) -> Result<()> {
    let stats = aggregator.analyze_feedback(store).await?;
    let sentiment = aggregator.sentiment_counts(store).await?;

    if json {
        let value = serde_json::json!({
            "total_feedback": stats.total_feedback,
            "average_rating": stats.average_rating,
            "feedback_type_counts": stats.feedback_type_counts,
            "sentiment_counts": sentiment,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_global_stats(&stats, &sentiment);
    }
    Ok(())
}

pub async fn handle_service_command(
    store: &dyn FeedbackStore,
    aggregator: &Aggregator,
    service: &str,
    json: bool,
) -> Result<()> {
    let stats = aggregator.analyze_service(store, service).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_service_stats(service, &stats);
    }
    Ok(())
}

pub async fn handle_warmup_command(store: &dyn FeedbackStore, aggregator: &Aggregator) -> Result<()> {
    print_info("🔥 Precomputing sentiment and keywords...");
    let started = std::time::Instant::now();
    let report = aggregator.warm_up_store(store).await;
    print_warm_up_report(&report, &aggregator.analyzer().cache().info());
    println!("  Time taken: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}

pub async fn handle_feedbacks_command(
    store: &dyn FeedbackStore,
    aggregator: &Aggregator,
    limit: i64,
    skip: i64,
    json: bool,
) -> Result<()> {
    let documents = store.list(limit, skip).await?;
    let analyzed: Vec<AnalyzedFeedback> = documents
        .into_iter()
        .map(|doc| aggregator.describe(doc))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&analyzed)?);
    } else {
        print_feedback_list(&analyzed);
    }
    Ok(())
}
