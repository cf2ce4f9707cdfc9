//! API request and response types
//!
//! Field names are camelCase to match the dashboard front end.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::analysis::CacheInfo;
use crate::models::AnalyzedFeedback;
use crate::models::GlobalStats;
use crate::models::Keyword;
use crate::models::SentimentBreakdown;
use crate::models::ServiceStats;
use crate::models::WarmUpReport;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pagination parameters for the feedback list
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

const fn default_limit() -> i64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordResponse {
    pub word: String,
    pub frequency: usize,
}

impl From<Keyword> for KeywordResponse {
    fn from(keyword: Keyword) -> Self {
        Self {
            word: keyword.word,
            frequency: keyword.frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: u64,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One feedback document with its analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub feedback_type: String,
    pub service: String,
    pub message: String,
    pub rating: i32,
    pub attach_screenshot: bool,
    pub agree_to_terms: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub top_keywords: Vec<KeywordResponse>,
}

impl From<AnalyzedFeedback> for FeedbackResponse {
    fn from(analyzed: AnalyzedFeedback) -> Self {
        let doc = analyzed.document;
        Self {
            id: doc.id.to_string(),
            message: doc.message.unwrap_or_default(),
            name: doc.name,
            email: doc.email,
            feedback_type: doc.feedback_type,
            service: doc.service,
            rating: doc.rating,
            attach_screenshot: doc.attach_screenshot,
            agree_to_terms: doc.agree_to_terms,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            sentiment: analyzed.sentiment.label.to_string(),
            sentiment_score: analyzed.sentiment.score,
            top_keywords: analyzed
                .top_keywords
                .into_iter()
                .map(KeywordResponse::from)
                .collect(),
        }
    }
}

/// Collection-wide analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysisResponse {
    pub average_rating: f64,
    pub total_feedback: u64,
    pub feedback_type_counts: Vec<KeyValuePair>,
    pub sentiment_counts: Vec<KeyValuePair>,
}

impl FeedbackAnalysisResponse {
    pub fn new(stats: GlobalStats, sentiment: SentimentBreakdown) -> Self {
        Self {
            average_rating: stats.average_rating,
            total_feedback: stats.total_feedback,
            feedback_type_counts: stats
                .feedback_type_counts
                .into_iter()
                .map(|(key, value)| KeyValuePair::new(key, value))
                .collect(),
            sentiment_counts: sentiment
                .entries()
                .into_iter()
                .map(|(label, count)| KeyValuePair::new(label.as_str(), count))
                .collect(),
        }
    }
}

/// Analysis of a single service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAnalysisResponse {
    pub service: String,
    pub total_feedback: u64,
    pub average_rating: f64,
    pub average_sentiment: f64,
    pub sentiment_breakdown: SentimentBreakdown,
    pub top_keywords: Vec<String>,
}

impl ServiceAnalysisResponse {
    pub fn new(service: String, stats: ServiceStats) -> Self {
        Self {
            service,
            total_feedback: stats.total_feedback,
            average_rating: stats.average_rating,
            average_sentiment: stats.average_sentiment,
            sentiment_breakdown: stats.sentiment_breakdown,
            top_keywords: stats.top_keywords,
        }
    }
}

/// Warm-up result with wall-clock duration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputeResponse {
    #[serde(flatten)]
    pub report: WarmUpReport,
    /// e.g. "0.42 seconds"
    pub time_taken: String,
}

/// Memo table statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub enabled: bool,
    pub total_entries: usize,
    pub tables: Vec<CacheTableResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheTableResponse {
    pub name: String,
    pub entries: usize,
    pub capacity: usize,
    pub usage_percentage: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl From<CacheInfo> for CacheStatsResponse {
    fn from(info: CacheInfo) -> Self {
        Self {
            enabled: info.enabled,
            total_entries: info.total_entries(),
            tables: info
                .tables
                .iter()
                .map(|table| CacheTableResponse {
                    name: table.name.to_string(),
                    entries: table.entries,
                    capacity: table.capacity,
                    usage_percentage: table.usage_percentage(),
                    hits: table.stats.hits,
                    misses: table.stats.misses,
                    evictions: table.stats.evictions,
                    hit_rate: table.stats.hit_rate(),
                })
                .collect(),
        }
    }
}
