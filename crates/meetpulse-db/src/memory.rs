//! In-memory document store.
//!
//! Implements every repository trait over insertion-ordered vectors with the
//! same matching rules as the PostgreSQL store. Used for local runs
//! (`STORE_BACKEND=memory`) and tests. `set_unavailable(true)` makes every
//! call fail the way an unreachable database would.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use meetpulse_core::{
    merge_documents, new_v7, AiInsight, CreateFeedbackRequest, Error, Feedback,
    FeedbackRepository, InsightRepository, JsonMap, Meeting, MeetingRepository, Result,
    UserProfile, UserRepository,
};

/// Shared in-memory collections.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<JsonMap>>,
    meetings: RwLock<Vec<Meeting>>,
    feedback: RwLock<Vec<Feedback>>,
    insights: RwLock<Vec<AiInsight>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage: while set, every operation returns
    /// `Error::Database`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        self.check_available()?;
        let users = self.users.read().await;
        users
            .iter()
            .find(|doc| doc.get("email").and_then(|v| v.as_str()) == Some(email))
            .map(|doc| serde_json::from_value(doc.clone().into()).map_err(Error::from))
            .transpose()
    }

    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile> {
        self.check_available()?;
        let update = profile.to_document()?;
        let mut users = self.users.write().await;

        let existing = users
            .iter_mut()
            .find(|doc| doc.get("email").and_then(|v| v.as_str()) == Some(profile.email.as_str()));

        let stored = match existing {
            Some(doc) => {
                merge_documents(doc, update);
                doc.clone()
            }
            None => {
                users.push(update.clone());
                update
            }
        };

        Ok(serde_json::from_value(stored.into())?)
    }
}

#[async_trait]
impl MeetingRepository for MemoryStore {
    async fn insert(&self, meeting: Meeting) -> Result<Meeting> {
        self.check_available()?;
        self.meetings.write().await.push(meeting.clone());
        Ok(meeting)
    }

    async fn list(&self) -> Result<Vec<Meeting>> {
        self.check_available()?;
        Ok(self.meetings.read().await.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Meeting>> {
        self.check_available()?;
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .find(|m| m.matches_id(id))
            .cloned())
    }

    async fn list_by_candidate_id(&self, id: &str) -> Result<Vec<Meeting>> {
        self.check_available()?;
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .filter(|m| m.candidate_id() == Some(id))
            .cloned()
            .collect())
    }

    async fn count_hosted_by(&self, identity: &str) -> Result<i64> {
        self.check_available()?;
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .filter(|m| m.created_by == identity)
            .count() as i64)
    }

    async fn list_hosted_by(&self, identity: &str) -> Result<Vec<Meeting>> {
        self.check_available()?;
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .filter(|m| m.created_by == identity)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for MemoryStore {
    async fn insert(&self, req: CreateFeedbackRequest) -> Result<Feedback> {
        self.check_available()?;
        let feedback = req.into_feedback(new_v7(), Utc::now());
        self.feedback.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        self.check_available()?;
        Ok(self.feedback.read().await.clone())
    }

    async fn list_for_meetings(&self, meeting_ids: &[String]) -> Result<Vec<Feedback>> {
        self.check_available()?;
        Ok(self
            .feedback
            .read()
            .await
            .iter()
            .filter(|fb| meeting_ids.iter().any(|id| *id == fb.meeting_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InsightRepository for MemoryStore {
    async fn insert(&self, content: JsonMap) -> Result<AiInsight> {
        self.check_available()?;
        let insight = AiInsight::new(new_v7(), Utc::now(), content);
        self.insights.write().await.push(insight.clone());
        Ok(insight)
    }

    async fn list(&self) -> Result<Vec<AiInsight>> {
        self.check_available()?;
        Ok(self.insights.read().await.clone())
    }
}
