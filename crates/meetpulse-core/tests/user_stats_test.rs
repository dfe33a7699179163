//! Aggregator behaviour against a scripted store.
//!
//! Covers the hosted-meeting count, rating discovery across nested feedback
//! responses, id fallback, and propagation of store failures.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use meetpulse_core::{
    compute_user_stats, CreateFeedbackRequest, Error, Feedback, FeedbackRepository, Meeting,
    MeetingRepository, Result, UserStats,
};
use serde_json::{json, Value};

#[derive(Default)]
struct ScriptedStore {
    meetings: Vec<Meeting>,
    feedback: Vec<Feedback>,
    fail_reads: bool,
    feedback_queries: AtomicUsize,
}

impl ScriptedStore {
    fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self
    }

    fn with_feedback(mut self, meeting_id: &str, responses: Value) -> Self {
        self.feedback.push(Feedback {
            id: None,
            meeting_id: meeting_id.to_string(),
            user_id: "attendee@x.com".to_string(),
            responses: responses.as_object().cloned().unwrap(),
            created_at: None,
        });
        self
    }

    fn check(&self) -> Result<()> {
        if self.fail_reads {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MeetingRepository for ScriptedStore {
    async fn insert(&self, _meeting: Meeting) -> Result<Meeting> {
        unreachable!("aggregator never writes")
    }

    async fn list(&self) -> Result<Vec<Meeting>> {
        self.check()?;
        Ok(self.meetings.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Meeting>> {
        self.check()?;
        Ok(self.meetings.iter().find(|m| m.matches_id(id)).cloned())
    }

    async fn list_by_candidate_id(&self, id: &str) -> Result<Vec<Meeting>> {
        self.check()?;
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.candidate_id() == Some(id))
            .cloned()
            .collect())
    }

    async fn count_hosted_by(&self, identity: &str) -> Result<i64> {
        self.check()?;
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.created_by == identity)
            .count() as i64)
    }

    async fn list_hosted_by(&self, identity: &str) -> Result<Vec<Meeting>> {
        self.check()?;
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.created_by == identity)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for ScriptedStore {
    async fn insert(&self, _req: CreateFeedbackRequest) -> Result<Feedback> {
        unreachable!("aggregator never writes")
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        self.check()?;
        Ok(self.feedback.clone())
    }

    async fn list_for_meetings(&self, meeting_ids: &[String]) -> Result<Vec<Feedback>> {
        self.check()?;
        self.feedback_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .feedback
            .iter()
            .filter(|fb| meeting_ids.contains(&fb.meeting_id))
            .cloned()
            .collect())
    }
}

async fn stats_for(store: &ScriptedStore, identity: &str) -> UserStats {
    compute_user_stats(store, store, identity)
        .await
        .expect("stats should compute")
}

#[tokio::test]
async fn test_two_meetings_with_feedback() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_meeting(Meeting::new("m2", "a@x.com"))
        .with_feedback("m1", json!({"overallSatisfaction": 5, "technicalSetup": 3}))
        .with_feedback("m2", json!({"overallSatisfaction": 4}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.meetings_hosted, 2);
    assert_eq!(stats.avg_rating, 4.0);
}

#[tokio::test]
async fn test_hosted_meeting_without_feedback() {
    let store = ScriptedStore::default().with_meeting(Meeting::new("m1", "a@x.com"));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats, UserStats { meetings_hosted: 1, avg_rating: 0.0 });
}

#[tokio::test]
async fn test_only_numeric_answers_count() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_feedback(
            "m1",
            json!({
                "agendaSharedInAdvance": true,
                "improvementAreas": "none",
                "overallSatisfaction": 5,
            }),
        );

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.avg_rating, 5.0);
}

#[tokio::test]
async fn test_no_hosted_meetings_ignores_all_feedback() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "someone-else@x.com"))
        .with_feedback("m1", json!({"overallSatisfaction": 2}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats, UserStats::EMPTY);
    assert_eq!(store.feedback_queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_boundary_values() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_feedback("m1", json!({"a": 0, "b": 1, "c": 5, "d": 6}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.avg_rating, 3.0);
}

#[tokio::test]
async fn test_average_is_rounded() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_feedback("m1", json!({"a": 5, "b": 5}))
        .with_feedback("m1", json!({"a": 4}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.avg_rating, 4.67);
}

#[tokio::test]
async fn test_meeting_without_meeting_id_matches_by_id() {
    let mut legacy = Meeting::new("legacy-1", "a@x.com");
    legacy.meeting_id = None;
    let store = ScriptedStore::default()
        .with_meeting(legacy)
        .with_feedback("legacy-1", json!({"overallSatisfaction": 2}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.meetings_hosted, 1);
    assert_eq!(stats.avg_rating, 2.0);
}

#[tokio::test]
async fn test_orphaned_feedback_is_ignored() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_feedback("m1", json!({"overallSatisfaction": 4}))
        .with_feedback("deleted-meeting", json!({"overallSatisfaction": 1}));

    let stats = stats_for(&store, "a@x.com").await;

    assert_eq!(stats.avg_rating, 4.0);
}

#[tokio::test]
async fn test_repeated_invocation_is_identical() {
    let store = ScriptedStore::default()
        .with_meeting(Meeting::new("m1", "a@x.com"))
        .with_meeting(Meeting::new("m2", "a@x.com"))
        .with_feedback("m1", json!({"x": 1, "y": 2}))
        .with_feedback("m2", json!({"x": 2}));

    let first = stats_for(&store, "a@x.com").await;
    let second = stats_for(&store, "a@x.com").await;

    assert_eq!(first, second);
    assert_eq!(first.avg_rating.to_bits(), second.avg_rating.to_bits());
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = ScriptedStore {
        fail_reads: true,
        ..Default::default()
    };

    let err = compute_user_stats(&store, &store, "a@x.com")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
}
