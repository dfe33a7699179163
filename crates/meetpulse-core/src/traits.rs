//! Repository traits for the meetpulse document store.
//!
//! These traits define the interfaces that store backends must satisfy.
//! Handlers and the statistics aggregator receive them explicitly, so the
//! PostgreSQL store and the in-memory store are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user profiles, keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the profile stored for `email`.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    /// Insert or merge a profile by email and return the stored document.
    ///
    /// Top-level keys in `profile` overwrite stored ones; keys it does not
    /// carry are kept.
    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile>;
}

// =============================================================================
// MEETING REPOSITORY
// =============================================================================

/// Repository for meetings. Meetings are returned in insertion order.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Store a new meeting.
    async fn insert(&self, meeting: Meeting) -> Result<Meeting>;

    /// List every meeting.
    async fn list(&self) -> Result<Vec<Meeting>>;

    /// Find a meeting whose `id` or `meetingId` equals `id`.
    async fn find(&self, id: &str) -> Result<Option<Meeting>>;

    /// List meetings whose candidate id (`meetingId`, else `id`) equals `id`,
    /// i.e. every meeting a feedback record with this `meetingId` counts for.
    async fn list_by_candidate_id(&self, id: &str) -> Result<Vec<Meeting>>;

    /// Count meetings whose `createdBy` equals `identity`.
    async fn count_hosted_by(&self, identity: &str) -> Result<i64>;

    /// List meetings whose `createdBy` equals `identity`.
    async fn list_hosted_by(&self, identity: &str) -> Result<Vec<Meeting>>;
}

// =============================================================================
// FEEDBACK REPOSITORY
// =============================================================================

/// Repository for append-only feedback records.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Record a submission, assigning its id and `createdAt`.
    async fn insert(&self, req: CreateFeedbackRequest) -> Result<Feedback>;

    /// List every feedback record.
    async fn list(&self) -> Result<Vec<Feedback>>;

    /// List feedback whose `meetingId` is a member of `meeting_ids`.
    async fn list_for_meetings(&self, meeting_ids: &[String]) -> Result<Vec<Feedback>>;
}

// =============================================================================
// AI INSIGHT REPOSITORY
// =============================================================================

/// Repository for stored AI insights.
#[async_trait]
pub trait InsightRepository: Send + Sync {
    /// Store an insight document.
    async fn insert(&self, content: JsonMap) -> Result<AiInsight>;

    /// List every stored insight.
    async fn list(&self) -> Result<Vec<AiInsight>>;
}

// =============================================================================
// STORE HANDLE
// =============================================================================

/// The set of store capabilities a request handler works against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub meetings: Arc<dyn MeetingRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub insights: Arc<dyn InsightRepository>,
}

impl Repositories {
    /// Build a handle from a single backend implementing every repository.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + MeetingRepository
            + FeedbackRepository
            + InsightRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            meetings: store.clone(),
            feedback: store.clone(),
            insights: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
