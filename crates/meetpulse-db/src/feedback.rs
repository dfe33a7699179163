//! Feedback repository implementation. Records are append-only.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;

use meetpulse_core::{
    new_v7, CreateFeedbackRequest, Error, Feedback, FeedbackRepository, Result,
};

/// PostgreSQL implementation of FeedbackRepository.
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: Pool<Postgres>,
}

impl PgFeedbackRepository {
    /// Create a new PgFeedbackRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn feedback_from_row(row: PgRow) -> Result<Feedback> {
    Ok(serde_json::from_value(row.get::<JsonValue, _>("doc"))?)
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn insert(&self, req: CreateFeedbackRequest) -> Result<Feedback> {
        let id = new_v7();
        let now = Utc::now();
        let feedback = req.into_feedback(id, now);
        let doc = serde_json::to_value(&feedback)?;

        sqlx::query("INSERT INTO feedback (id, doc, created_at_utc) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&doc)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "feedback",
            op = "insert",
            feedback_id = %id,
            meeting_id = %feedback.meeting_id,
            "Feedback stored"
        );

        Ok(feedback)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        let rows = sqlx::query("SELECT doc FROM feedback ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.into_iter().map(feedback_from_row).collect()
    }

    async fn list_for_meetings(&self, meeting_ids: &[String]) -> Result<Vec<Feedback>> {
        if meeting_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows =
            sqlx::query("SELECT doc FROM feedback WHERE doc->>'meetingId' = ANY($1) ORDER BY seq")
                .bind(meeting_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

        rows.into_iter().map(feedback_from_row).collect()
    }
}
