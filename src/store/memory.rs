use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::FeedbackStore;
use crate::models::CreateFeedbackRequest;
use crate::models::FeedbackDocument;
use crate::models::FeedbackGroup;
use crate::models::GroupField;
use crate::models::MessageRecord;
use crate::AnalyticsError;
use crate::Result;

/// Process-local store keeping documents in insertion order
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<FeedbackDocument>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<FeedbackDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
            offline: AtomicBool::new(false),
        }
    }

    pub async fn insert(&self, document: FeedbackDocument) {
        self.documents.write().await.push(document);
    }

    pub async fn create(&self, request: CreateFeedbackRequest) -> FeedbackDocument {
        let document = request.into_document();
        self.insert(document.clone()).await;
        document
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Make every subsequent call fail as if the backend were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AnalyticsError::Store("in-memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn page_bounds(len: usize, limit: i64, offset: i64) -> Result<(usize, usize)> {
    if limit < 0 || offset < 0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "limit and offset must not be negative (limit={limit}, offset={offset})"
        )));
    }
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(len);
    Ok((start, end))
}

#[async_trait]
impl FeedbackStore for InMemoryStore {
    async fn group(
        &self,
        service: Option<&str>,
        field: GroupField,
    ) -> Result<Option<FeedbackGroup>> {
        self.check_online()?;
        let documents = self.documents.read().await;
        Ok(FeedbackGroup::collect(documents.iter(), service, field))
    }

    async fn scan_messages(&self, limit: i64, offset: i64) -> Result<Vec<MessageRecord>> {
        self.check_online()?;
        let documents = self.documents.read().await;
        let (start, end) = page_bounds(documents.len(), limit, offset)?;
        Ok(documents[start..end]
            .iter()
            .map(|doc| MessageRecord {
                id: doc.id,
                message: doc.message.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedbackDocument>> {
        self.check_online()?;
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|doc| doc.id == id).cloned())
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<FeedbackDocument>> {
        self.check_online()?;
        let mut documents = self.documents.read().await.clone();
        // stable, so equal timestamps keep newest-inserted first after the reverse
        documents.reverse();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let (start, end) = page_bounds(documents.len(), limit, skip)?;
        Ok(documents.drain(start..end).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check_online()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn request(service: &str, rating: i32, message: Option<&str>) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            feedback_type: "bug".into(),
            service: service.into(),
            message: message.map(str::to_string),
            rating,
            attach_screenshot: false,
            agree_to_terms: true,
        }
    }

    #[tokio::test]
    async fn test_scan_pages_in_insertion_order() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .create(request("billing", 3, Some(&format!("message {i}"))))
                .await;
        }

        let first = store.scan_messages(2, 0).await.unwrap();
        let last = store.scan_messages(2, 4).await.unwrap();
        let past_end = store.scan_messages(2, 10).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].message.as_deref(), Some("message 0"));
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].message.as_deref(), Some("message 4"));
        assert!(past_end.is_empty());
        assert!(store.scan_messages(-1, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryStore::new();
        let mut old = request("billing", 1, Some("old")).into_document();
        old.created_at -= Duration::days(1);
        store.insert(old).await;
        store.create(request("billing", 5, Some("new"))).await;

        let page = store.list(10, 0).await.unwrap();
        assert_eq!(page[0].message.as_deref(), Some("new"));
        assert_eq!(page[1].message.as_deref(), Some("old"));
        assert_eq!(store.list(1, 1).await.unwrap()[0].message.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = InMemoryStore::new();
        let doc = store.create(request("support", 4, None)).await;
        assert_eq!(store.find_by_id(doc.id).await.unwrap(), Some(doc));
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let err = store.ping().await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(store.group(None, GroupField::Message).await.is_err());

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
        assert!(store.group(None, GroupField::Message).await.unwrap().is_none());
    }
}
