use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::Result;

mod feedback;
mod schema;

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    table: String,
}

impl Database {
    /// Wrap an existing pool; `table` must already be a validated identifier
    #[must_use]
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    fn pool_options(config: &AppConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()))
    }

    /// Create a new database instance from configuration, connecting immediately
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let pool = Self::pool_options(config)
            .connect(config.database_url())
            .await?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}, table={}",
            config.max_connections(),
            config.min_connections(),
            config.table()
        );

        Ok(Self::new(pool, config.table()))
    }

    /// Like `from_config`, but connections are opened on first use.
    /// Only a malformed URL fails here; an unreachable server surfaces on the first query.
    pub fn connect_lazy(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let pool = Self::pool_options(config).connect_lazy(config.database_url())?;

        tracing::info!(
            "Database pool configured lazily: max_connections={}, table={}",
            config.max_connections(),
            config.table()
        );

        Ok(Self::new(pool, config.table()))
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FeedbackStore;
    use crate::AnalyticsError;

    fn unreachable_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = "postgresql://feedback@127.0.0.1:1/feedback".to_string();
        config.database.min_connections = 0;
        config.database.connection_timeout = 1;
        config
    }

    #[tokio::test]
    async fn test_lazy_pool_defers_connection_errors() {
        let database = Database::connect_lazy(&unreachable_config()).unwrap();
        assert_eq!(database.table(), "feedbacks");
        assert!(database.ping().await.is_err());
        assert!(database.is_schema_initialized().await.unwrap_err().is_store_failure());
    }

    #[tokio::test]
    async fn test_lazy_pool_still_validates_config() {
        let mut config = unreachable_config();
        config.database.table = "feedbacks; DROP TABLE x".to_string();
        assert!(matches!(
            Database::connect_lazy(&config),
            Err(AnalyticsError::Config(_))
        ));
    }
}
