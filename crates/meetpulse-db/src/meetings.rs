//! Meeting repository implementation.
//!
//! Meetings are JSONB documents; queries filter on JSON paths so stored
//! documents keep whatever extra keys the client sent.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use meetpulse_core::{Error, Meeting, MeetingRepository, Result};

/// PostgreSQL implementation of MeetingRepository.
#[derive(Clone)]
pub struct PgMeetingRepository {
    pool: Pool<Postgres>,
}

impl PgMeetingRepository {
    /// Create a new PgMeetingRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn meeting_from_row(row: PgRow) -> Result<Meeting> {
    Ok(serde_json::from_value(row.get::<JsonValue, _>("doc"))?)
}

#[async_trait]
impl MeetingRepository for PgMeetingRepository {
    async fn insert(&self, meeting: Meeting) -> Result<Meeting> {
        let doc = serde_json::to_value(&meeting)?;

        sqlx::query("INSERT INTO meeting (doc, created_at_utc) VALUES ($1, $2)")
            .bind(&doc)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(meeting)
    }

    async fn list(&self) -> Result<Vec<Meeting>> {
        let rows = sqlx::query("SELECT doc FROM meeting ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.into_iter().map(meeting_from_row).collect()
    }

    async fn find(&self, id: &str) -> Result<Option<Meeting>> {
        let row = sqlx::query(
            r#"
            SELECT doc
            FROM meeting
            WHERE doc->>'id' = $1 OR doc->>'meetingId' = $1
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(meeting_from_row).transpose()
    }

    async fn list_by_candidate_id(&self, id: &str) -> Result<Vec<Meeting>> {
        // Same precedence as `Meeting::candidate_id`: non-empty meetingId, else id.
        let rows = sqlx::query(
            r#"
            SELECT doc
            FROM meeting
            WHERE COALESCE(NULLIF(doc->>'meetingId', ''), NULLIF(doc->>'id', '')) = $1
            ORDER BY seq
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(meeting_from_row).collect()
    }

    async fn count_hosted_by(&self, identity: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meeting WHERE doc->>'createdBy' = $1")
            .bind(identity)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn list_hosted_by(&self, identity: &str) -> Result<Vec<Meeting>> {
        let rows = sqlx::query("SELECT doc FROM meeting WHERE doc->>'createdBy' = $1 ORDER BY seq")
            .bind(identity)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.into_iter().map(meeting_from_row).collect()
    }
}
