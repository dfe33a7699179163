//! User profile repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};

use meetpulse_core::{Error, Result, UserProfile, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query("SELECT doc FROM app_user WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(|r| serde_json::from_value(r.get::<JsonValue, _>("doc")).map_err(Error::from))
            .transpose()
    }

    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile> {
        let now = Utc::now();
        let doc = JsonValue::Object(profile.to_document()?);

        // `||` merges top-level keys, keeping any the update does not carry.
        let row = sqlx::query(
            r#"
            INSERT INTO app_user (email, doc, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (email) DO UPDATE
                SET doc = app_user.doc || EXCLUDED.doc,
                    updated_at_utc = EXCLUDED.updated_at_utc
            RETURNING doc
            "#,
        )
        .bind(&profile.email)
        .bind(&doc)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(serde_json::from_value(row.get::<JsonValue, _>("doc"))?)
    }
}
