//! Folding analyzed feedback into collection-wide and per-service statistics

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use super::keywords::count_in_order;
use super::keywords::most_common;
use super::FeedbackAnalyzer;
use crate::config::AnalysisConfig;
use crate::models::round2;
use crate::models::AnalyzedFeedback;
use crate::models::FeedbackDocument;
use crate::models::FeedbackGroup;
use crate::models::GlobalStats;
use crate::models::GroupField;
use crate::models::SentimentBreakdown;
use crate::models::ServiceStats;
use crate::models::WarmUpReport;
use crate::store::FeedbackStore;
use crate::Result;

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round2(total / count as f64)
    }
}

#[derive(Clone)]
pub struct Aggregator {
    analyzer: Arc<FeedbackAnalyzer>,
    settings: AnalysisConfig,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Arc::new(FeedbackAnalyzer::default()), AnalysisConfig::default())
    }
}

impl Aggregator {
    pub fn new(analyzer: Arc<FeedbackAnalyzer>, settings: AnalysisConfig) -> Self {
        Self { analyzer, settings }
    }

    pub fn analyzer(&self) -> &FeedbackAnalyzer {
        &self.analyzer
    }

    pub fn settings(&self) -> &AnalysisConfig {
        &self.settings
    }

    // ====== Folds over in-memory input ======

    /// Count, average rating and per-type counts over `documents`
    pub fn global_stats<'a, I>(&self, documents: I) -> GlobalStats
    where
        I: IntoIterator<Item = &'a FeedbackDocument>,
    {
        match FeedbackGroup::collect(documents, None, GroupField::FeedbackType) {
            Some(group) => Self::fold_global(&group),
            None => GlobalStats::default(),
        }
    }

    /// Statistics over documents that all belong to one service
    pub fn service_stats<'a, I>(&self, documents: I) -> ServiceStats
    where
        I: IntoIterator<Item = &'a FeedbackDocument>,
    {
        match FeedbackGroup::collect(documents, None, GroupField::Message) {
            Some(group) => self.fold_service(&group),
            None => ServiceStats::default(),
        }
    }

    pub fn fold_global(group: &FeedbackGroup) -> GlobalStats {
        let count = usize::try_from(group.total_feedback).unwrap_or_default();
        let mut feedback_type_counts = BTreeMap::new();
        for feedback_type in &group.values {
            *feedback_type_counts.entry(feedback_type.clone()).or_insert(0) += 1;
        }
        GlobalStats {
            total_feedback: count as u64,
            average_rating: average(group.total_rating as f64, count),
            feedback_type_counts,
        }
    }

    /// Sentiment over every non-empty message, pooled keyword ranking.
    ///
    /// Each message contributes its own top `harvest_top_n` words; the words are
    /// then counted by how many per-message lists they appear in, not by their
    /// total occurrences.
    pub fn fold_service(&self, group: &FeedbackGroup) -> ServiceStats {
        let count = usize::try_from(group.total_feedback).unwrap_or_default();
        let mut breakdown = SentimentBreakdown::default();
        let mut score_sum = 0.0;
        let mut scored = 0usize;
        let mut pool = Vec::new();

        for message in group.values.iter().filter(|m| !m.is_empty()) {
            score_sum += self.analyzer.sentiment_score(message);
            breakdown.record(self.analyzer.classify(message));
            scored += 1;
            pool.extend(
                self.analyzer
                    .top_keywords(message, self.settings.harvest_top_n)
                    .into_iter()
                    .map(|keyword| keyword.word),
            );
        }

        let top_keywords = most_common(count_in_order(pool), self.settings.service_top_keywords)
            .into_iter()
            .map(|(word, _)| word)
            .collect();

        ServiceStats {
            total_feedback: count as u64,
            average_rating: average(group.total_rating as f64, count),
            average_sentiment: average(score_sum, scored),
            sentiment_breakdown: breakdown,
            top_keywords,
        }
    }

    /// Populate every memo table for each document's message
    pub fn warm_up<'a, I>(&self, documents: I) -> WarmUpReport
    where
        I: IntoIterator<Item = &'a FeedbackDocument>,
    {
        let mut processed = 0usize;
        for document in documents {
            self.warm_message(document.message.as_deref());
            processed += 1;
        }
        info!("Precomputed sentiment and keywords for {} documents", processed);
        WarmUpReport::Success {
            processed_docs: processed,
        }
    }

    fn warm_message(&self, message: Option<&str>) {
        if let Some(text) = message.filter(|m| !m.is_empty()) {
            self.analyzer.sentiment_score(text);
            self.analyzer.classify(text);
            self.analyzer.top_keywords(text, self.settings.harvest_top_n);
        }
    }

    /// Per-document sentiment and top keywords
    pub fn describe(&self, document: FeedbackDocument) -> AnalyzedFeedback {
        self.analyzer.analyze(document, self.settings.default_top_n)
    }

    // ====== Store-driven queries ======

    pub async fn analyze_feedback(&self, store: &dyn FeedbackStore) -> Result<GlobalStats> {
        let group = store
            .group(None, GroupField::FeedbackType)
            .await
            .map_err(|e| {
                error!("Error in analyze_feedback: {}", e);
                e
            })?;
        Ok(group.as_ref().map(Self::fold_global).unwrap_or_default())
    }

    pub async fn analyze_service(
        &self,
        store: &dyn FeedbackStore,
        service: &str,
    ) -> Result<ServiceStats> {
        let group = store
            .group(Some(service), GroupField::Message)
            .await
            .map_err(|e| {
                error!("Error in analyze_service for {}: {}", service, e);
                e
            })?;
        debug!(
            "Service {} has {} feedback documents",
            service,
            group.as_ref().map_or(0, |g| g.total_feedback)
        );
        Ok(group
            .map(|g| self.fold_service(&g))
            .unwrap_or_default())
    }

    /// Label counts over every non-empty message in the store
    pub async fn sentiment_counts(&self, store: &dyn FeedbackStore) -> Result<SentimentBreakdown> {
        let mut breakdown = SentimentBreakdown::default();
        if let Some(group) = store.group(None, GroupField::Message).await? {
            for message in group.values.iter().filter(|m| !m.is_empty()) {
                breakdown.record(self.analyzer.classify(message));
            }
        }
        Ok(breakdown)
    }

    /// Warm the caches from the store page by page; failures are reported, not raised
    pub async fn warm_up_store(&self, store: &dyn FeedbackStore) -> WarmUpReport {
        match self.scan_and_warm(store).await {
            Ok(processed) => {
                info!("Precomputed sentiment and keywords for {} documents", processed);
                WarmUpReport::Success {
                    processed_docs: processed,
                }
            }
            Err(e) => {
                error!("Error in cache warm-up: {}", e);
                WarmUpReport::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn scan_and_warm(&self, store: &dyn FeedbackStore) -> Result<usize> {
        let batch_size = self.settings.warm_up_batch_size.max(1);
        let mut offset = 0i64;
        let mut processed = 0usize;

        loop {
            let page = store.scan_messages(batch_size, offset).await?;
            let fetched = page.len();
            for record in &page {
                self.warm_message(record.message.as_deref());
            }
            processed += fetched;
            debug!("Warm-up processed {} documents so far", processed);

            if (fetched as i64) < batch_size {
                break;
            }
            offset += batch_size;
            tokio::task::yield_now().await;
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisCache;
    use crate::analysis::SentimentEngine;
    use crate::models::CreateFeedbackRequest;
    use crate::store::InMemoryStore;

    fn doc(service: &str, feedback_type: &str, rating: i32, message: Option<&str>) -> FeedbackDocument {
        CreateFeedbackRequest {
            name: "Linus".into(),
            email: "linus@example.com".into(),
            feedback_type: feedback_type.into(),
            service: service.into(),
            message: message.map(str::to_string),
            rating,
            attach_screenshot: false,
            agree_to_terms: true,
        }
        .into_document()
    }

    fn small_batches(batch: i64) -> Aggregator {
        Aggregator::new(
            Arc::new(FeedbackAnalyzer::default()),
            AnalysisConfig {
                warm_up_batch_size: batch,
                ..AnalysisConfig::default()
            },
        )
    }

    #[test]
    fn test_global_stats_empty() {
        let stats = Aggregator::default().global_stats(&Vec::<FeedbackDocument>::new());
        assert_eq!(stats.total_feedback, 0);
        assert!(stats.average_rating.abs() < f64::EPSILON);
        assert!(stats.feedback_type_counts.is_empty());
    }

    #[test]
    fn test_global_stats_counts_types() {
        let docs = vec![
            doc("web", "bug", 4, Some("a")),
            doc("web", "bug", 2, None),
            doc("app", "feature", 5, Some("c")),
        ];
        let stats = Aggregator::default().global_stats(&docs);
        assert_eq!(stats.total_feedback, 3);
        assert!((stats.average_rating - 3.67).abs() < 1e-9);
        assert_eq!(stats.feedback_type_counts.get("bug"), Some(&2));
        assert_eq!(stats.feedback_type_counts.get("feature"), Some(&1));
    }

    #[test]
    fn test_service_stats_skips_empty_messages() {
        let docs = vec![
            doc("checkout", "bug", 1, Some("This is terrible and awful")),
            doc("checkout", "bug", 5, Some("This is absolutely wonderful and great")),
            doc("checkout", "other", 3, None),
            doc("checkout", "other", 3, Some("")),
        ];
        let stats = Aggregator::default().service_stats(&docs);

        assert_eq!(stats.total_feedback, 4);
        assert!((stats.average_rating - 3.0).abs() < 1e-9);
        assert_eq!(stats.sentiment_breakdown.total(), 2);
        assert_eq!(stats.sentiment_breakdown.positive, 1);
        assert_eq!(stats.sentiment_breakdown.negative, 1);
        assert!((-1.0..=1.0).contains(&stats.average_sentiment));
    }

    #[test]
    fn test_service_stats_empty() {
        let stats = Aggregator::default().service_stats(&Vec::<FeedbackDocument>::new());
        assert_eq!(stats, ServiceStats::default());
    }

    #[test]
    fn test_pooled_keywords_rank_by_list_membership() {
        let docs = vec![
            doc("app", "bug", 3, Some("crash crash crash crash login")),
            doc("app", "bug", 3, Some("login screen")),
            doc("app", "bug", 3, Some("login slow")),
        ];
        let stats = Aggregator::default().service_stats(&docs);
        // "crash" occurs four times but only in one list
        assert_eq!(stats.top_keywords[0], "login");
        assert_eq!(stats.top_keywords[1], "crash");
        assert_eq!(stats.top_keywords, vec!["login", "crash", "screen", "slow"]);
    }

    #[test]
    fn test_results_match_without_cache() {
        let docs = vec![
            doc("app", "bug", 2, Some("Checkout is slow and buggy")),
            doc("app", "praise", 5, Some("Love it, thanks!")),
            doc("app", "bug", 1, Some("Checkout is slow and buggy")),
        ];
        let cached = Aggregator::default();
        let uncached = Aggregator::new(
            Arc::new(FeedbackAnalyzer::new(
                SentimentEngine::default(),
                Arc::new(AnalysisCache::disabled()),
            )),
            AnalysisConfig::default(),
        );
        assert_eq!(cached.service_stats(&docs), uncached.service_stats(&docs));
        assert_eq!(cached.service_stats(&docs), cached.service_stats(&docs));
    }

    #[test]
    fn test_warm_up_counts_every_document() {
        let docs = vec![
            doc("app", "bug", 2, Some("slow page")),
            doc("app", "bug", 2, None),
            doc("app", "bug", 2, Some("slow page")),
        ];
        let aggregator = Aggregator::default();
        let report = aggregator.warm_up(&docs);
        assert_eq!(report, WarmUpReport::Success { processed_docs: 3 });

        let cache = aggregator.analyzer().cache();
        assert_eq!(cache.scores.len(), 1);
        assert!(cache.keywords.contains(&("slow page".to_string(), 10)));
    }

    #[tokio::test]
    async fn test_warm_up_store_pages_through_everything() {
        let store = InMemoryStore::new();
        for i in 0..7 {
            store.insert(doc("app", "bug", 3, Some(&format!("issue number {i}")))).await;
        }
        let aggregator = small_batches(3);
        let report = aggregator.warm_up_store(&store).await;
        assert_eq!(report, WarmUpReport::Success { processed_docs: 7 });
        assert_eq!(aggregator.analyzer().cache().scores.len(), 7);

        // exact multiple of the batch size
        let aggregator = small_batches(7);
        assert_eq!(
            aggregator.warm_up_store(&store).await,
            WarmUpReport::Success { processed_docs: 7 }
        );
    }

    #[tokio::test]
    async fn test_warm_up_store_reports_failure() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let report = Aggregator::default().warm_up_store(&store).await;
        assert!(!report.is_success());
        match report {
            WarmUpReport::Error { error } => assert!(error.contains("offline")),
            WarmUpReport::Success { .. } => panic!("expected an error report"),
        }
    }

    #[tokio::test]
    async fn test_store_queries_propagate_failure() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let aggregator = Aggregator::default();
        assert!(aggregator.analyze_feedback(&store).await.is_err());
        assert!(aggregator.analyze_service(&store, "app").await.is_err());
        assert!(aggregator.sentiment_counts(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_analyze_service_filters_by_service() {
        let store = InMemoryStore::with_documents(vec![
            doc("billing", "bug", 4, Some("refund delayed")),
            doc("shipping", "bug", 1, Some("package lost")),
        ]);
        let aggregator = Aggregator::default();

        let stats = aggregator.analyze_service(&store, "billing").await.unwrap();
        assert_eq!(stats.total_feedback, 1);
        assert_eq!(stats.top_keywords, vec!["refund", "delayed"]);

        let missing = aggregator.analyze_service(&store, "nowhere").await.unwrap();
        assert_eq!(missing, ServiceStats::default());
    }
}
