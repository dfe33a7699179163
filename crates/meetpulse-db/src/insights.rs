//! AI insight repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};

use meetpulse_core::{new_v7, AiInsight, Error, InsightRepository, JsonMap, Result};

/// PostgreSQL implementation of InsightRepository.
#[derive(Clone)]
pub struct PgInsightRepository {
    pool: Pool<Postgres>,
}

impl PgInsightRepository {
    /// Create a new PgInsightRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightRepository for PgInsightRepository {
    async fn insert(&self, content: JsonMap) -> Result<AiInsight> {
        let insight = AiInsight::new(new_v7(), Utc::now(), content);
        let doc = serde_json::to_value(&insight)?;

        sqlx::query("INSERT INTO ai_insight (id, doc, created_at_utc) VALUES ($1, $2, $3)")
            .bind(insight.id)
            .bind(&doc)
            .bind(insight.created_at)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(insight)
    }

    async fn list(&self) -> Result<Vec<AiInsight>> {
        let rows = sqlx::query("SELECT doc FROM ai_insight ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.into_iter()
            .map(|r| -> Result<AiInsight> {
                Ok(serde_json::from_value(r.get::<JsonValue, _>("doc"))?)
            })
            .collect()
    }
}
