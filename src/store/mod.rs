//! Document store abstraction
//!
//! The analytics core only needs grouped aggregation, a paginated message scan
//! and single-document lookup. [`crate::database::Database`] implements this
//! against PostgreSQL; [`InMemoryStore`] backs tests and local tooling.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryStore;

use crate::models::FeedbackDocument;
use crate::models::FeedbackGroup;
use crate::models::GroupField;
use crate::models::MessageRecord;
use crate::Result;

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Count, rating sum and collected `field` values of the matching documents;
    /// `None` when no document matches
    async fn group(&self, service: Option<&str>, field: GroupField)
        -> Result<Option<FeedbackGroup>>;

    /// One page of `(id, message)` pairs in insertion order
    async fn scan_messages(&self, limit: i64, offset: i64) -> Result<Vec<MessageRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedbackDocument>>;

    /// Documents newest first
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<FeedbackDocument>>;

    /// Connectivity check
    async fn ping(&self) -> Result<()>;
}
