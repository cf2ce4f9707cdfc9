use async_trait::async_trait;
use uuid::Uuid;

use super::Database;
use crate::models::FeedbackDocument;
use crate::models::FeedbackGroup;
use crate::models::GroupField;
use crate::models::MessageRecord;
use crate::store::FeedbackStore;
use crate::Result;

const DOCUMENT_COLUMNS: &str = "id, name, email, feedback_type, service, message, rating, \
     attach_screenshot, agree_to_terms, created_at, updated_at";

impl Database {
    /// Insert a feedback document
    pub async fn insert_feedback(&self, doc: &FeedbackDocument) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {} ({DOCUMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            self.table
        ))
        .bind(doc.id)
        .bind(&doc.name)
        .bind(&doc.email)
        .bind(&doc.feedback_type)
        .bind(&doc.service)
        .bind(&doc.message)
        .bind(doc.rating)
        .bind(doc.attach_screenshot)
        .bind(doc.agree_to_terms)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn group_sql(&self, field: GroupField, by_service: bool) -> String {
        // missing messages are collected as empty strings
        let collected = match field {
            GroupField::FeedbackType => field.column().to_string(),
            GroupField::Message => format!("COALESCE({}, '')", field.column()),
        };
        let filter = if by_service { "WHERE service = $1" } else { "" };
        format!(
            "SELECT COUNT(*)::BIGINT, COALESCE(SUM(rating), 0)::BIGINT, \
             COALESCE(ARRAY_AGG({collected}), ARRAY[]::TEXT[]) \
             FROM {} {filter}",
            self.table
        )
    }
}

#[async_trait]
impl FeedbackStore for Database {
    async fn group(
        &self,
        service: Option<&str>,
        field: GroupField,
    ) -> Result<Option<FeedbackGroup>> {
        let sql = self.group_sql(field, service.is_some());
        let mut query = sqlx::query_as::<_, (i64, i64, Vec<String>)>(&sql);
        if let Some(service) = service {
            query = query.bind(service);
        }
        let (total_feedback, total_rating, values) = query.fetch_one(&self.pool).await?;

        if total_feedback == 0 {
            return Ok(None);
        }
        Ok(Some(FeedbackGroup {
            total_feedback,
            total_rating,
            values,
        }))
    }

    async fn scan_messages(&self, limit: i64, offset: i64) -> Result<Vec<MessageRecord>> {
        let rows = sqlx::query_as::<_, (Uuid, Option<String>)>(&format!(
            "SELECT id, message FROM {} ORDER BY created_at, id LIMIT $1 OFFSET $2",
            self.table
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, message)| MessageRecord { id, message })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedbackDocument>> {
        let doc = sqlx::query_as::<_, FeedbackDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM {} WHERE id = $1",
            self.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc)
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<FeedbackDocument>> {
        let docs = sqlx::query_as::<_, FeedbackDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM {} ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            self.table
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
