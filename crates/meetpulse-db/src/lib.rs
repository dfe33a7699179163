//! # meetpulse-db
//!
//! Document store backends for meetpulse.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL JSONB repositories for users, meetings, feedback, and insights
//! - An in-memory store with the same semantics for tests and local runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use meetpulse_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/meetpulse", 10).await?;
//!     db.migrate().await?;
//!
//!     let repos = db.repositories();
//!     let stats = meetpulse_core::compute_user_stats(
//!         repos.meetings.as_ref(),
//!         repos.feedback.as_ref(),
//!         "a@x.com",
//!     )
//!     .await?;
//!     println!("{:?}", stats);
//!     Ok(())
//! }
//! ```
pub mod feedback;
pub mod insights;
pub mod meetings;
pub mod memory;
pub mod pool;
pub mod users;

// Re-export core types
pub use meetpulse_core::*;

pub use feedback::PgFeedbackRepository;
pub use insights::PgInsightRepository;
pub use meetings::PgMeetingRepository;
pub use memory::MemoryStore;
pub use pool::{create_pool, log_pool_metrics, DEFAULT_MAX_CONNECTIONS};
pub use users::PgUserRepository;

use std::sync::Arc;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User profile repository.
    pub users: PgUserRepository,
    /// Meeting repository.
    pub meetings: PgMeetingRepository,
    /// Feedback repository.
    pub feedback: PgFeedbackRepository,
    /// AI insight repository.
    pub insights: PgInsightRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            meetings: PgMeetingRepository::new(pool.clone()),
            feedback: PgFeedbackRepository::new(pool.clone()),
            insights: PgInsightRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to `url` with a pool of at most `max_connections`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = create_pool(url, max_connections).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Store handle backed by this database.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.users.clone()),
            meetings: Arc::new(self.meetings.clone()),
            feedback: Arc::new(self.feedback.clone()),
            insights: Arc::new(self.insights.clone()),
        }
    }
}
