use super::Database;
use crate::Result;

/// Columns that get a btree index, with their sort direction
const INDEXED_COLUMNS: [(&str, &str); 4] = [
    ("service", "ASC"),
    ("feedback_type", "ASC"),
    ("rating", "ASC"),
    ("created_at", "DESC"),
];

impl Database {
    /// Check if the feedback table exists
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public'
                AND table_name = $1
            )
            ",
        )
        .bind(&self.table)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            tracing::debug!("Missing feedback table: {}", self.table);
        }
        Ok(exists)
    }

    /// Create the feedback table and its indexes if they are missing
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                feedback_type TEXT NOT NULL,
                service TEXT NOT NULL,
                message TEXT,
                rating INTEGER NOT NULL,
                attach_screenshot BOOLEAN NOT NULL DEFAULT FALSE,
                agree_to_terms BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
            table = self.table
        ))
        .execute(&self.pool)
        .await?;

        for (column, direction) in INDEXED_COLUMNS {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table} ({column} {direction})",
                table = self.table
            ))
            .execute(&self.pool)
            .await?;
            tracing::info!("Ensured index on {} field", column);
        }

        Ok(())
    }

    /// Drop the feedback table
    pub async fn drop_schema(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", self.table))
            .execute(&self.pool)
            .await?;
        tracing::warn!("Dropped table {}", self.table);
        Ok(())
    }
}
