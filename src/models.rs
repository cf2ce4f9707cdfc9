use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A single piece of customer feedback as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FeedbackDocument {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub feedback_type: String,
    pub service: String,
    pub message: Option<String>,
    pub rating: i32,
    pub attach_screenshot: bool,
    pub agree_to_terms: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackDocument {
    /// Message text, empty when missing
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Request to insert new feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub name: String,
    pub email: String,
    pub feedback_type: String,
    pub service: String,
    pub message: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub attach_screenshot: bool,
    pub agree_to_terms: bool,
}

impl CreateFeedbackRequest {
    /// Materialize a document with a fresh id and timestamps
    pub fn into_document(self) -> FeedbackDocument {
        let now = Utc::now();
        FeedbackDocument {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            feedback_type: self.feedback_type,
            service: self.service,
            message: self.message,
            rating: self.rating,
            attach_screenshot: self.attach_screenshot,
            agree_to_terms: self.agree_to_terms,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `(id, message)` pair produced by a store scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub message: Option<String>,
}

/// Which column a grouped aggregation collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    FeedbackType,
    Message,
}

impl GroupField {
    pub const fn column(self) -> &'static str {
        match self {
            Self::FeedbackType => "feedback_type",
            Self::Message => "message",
        }
    }
}

/// Result of a grouped aggregation over matching documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackGroup {
    pub total_feedback: i64,
    pub total_rating: i64,
    /// Collected column values, one per document; missing messages are empty strings
    pub values: Vec<String>,
}

impl FeedbackGroup {
    /// Group documents in memory; `None` when nothing matches
    pub fn collect<'a, I>(documents: I, service: Option<&str>, field: GroupField) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FeedbackDocument>,
    {
        let mut group = Self::default();
        for doc in documents {
            if service.is_some_and(|s| s != doc.service) {
                continue;
            }
            group.total_feedback += 1;
            group.total_rating += i64::from(doc.rating);
            group.values.push(match field {
                GroupField::FeedbackType => doc.feedback_type.clone(),
                GroupField::Message => doc.message_text().to_string(),
            });
        }
        (group.total_feedback > 0).then_some(group)
    }
}

/// Three-way sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Scores strictly above this are positive
    pub const POSITIVE_THRESHOLD: f64 = 0.1;
    /// Scores strictly below this are negative
    pub const NEGATIVE_THRESHOLD: f64 = -0.1;

    pub fn from_score(score: f64) -> Self {
        if score > Self::POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < Self::NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and label for one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub label: SentimentLabel,
}

impl SentimentResult {
    pub const NEUTRAL: Self = Self {
        score: 0.0,
        label: SentimentLabel::Neutral,
    };

    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

/// Token with its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub frequency: usize,
}

impl Keyword {
    pub fn new(word: impl Into<String>, frequency: usize) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// Per-label message counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentBreakdown {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub const fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Label/count pairs in a fixed positive, neutral, negative order
    pub fn entries(&self) -> [(SentimentLabel, u64); 3] {
        [
            (SentimentLabel::Positive, self.positive),
            (SentimentLabel::Neutral, self.neutral),
            (SentimentLabel::Negative, self.negative),
        ]
    }
}

/// Collection-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_feedback: u64,
    pub average_rating: f64,
    pub feedback_type_counts: BTreeMap<String, u64>,
}

/// Statistics for the feedback of a single service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub total_feedback: u64,
    pub average_rating: f64,
    pub average_sentiment: f64,
    pub sentiment_breakdown: SentimentBreakdown,
    pub top_keywords: Vec<String>,
}

/// A document with its per-message analysis attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedFeedback {
    pub document: FeedbackDocument,
    pub sentiment: SentimentResult,
    pub top_keywords: Vec<Keyword>,
}

/// Outcome of a cache warm-up run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WarmUpReport {
    Success { processed_docs: usize },
    Error { error: String },
}

impl WarmUpReport {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Round to two decimal places, away from zero on ties
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
