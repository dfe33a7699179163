//! HTTP tests driving the router against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use meetpulse_api::{build_router, AppState, ServerConfig};
use meetpulse_core::Repositories;
use meetpulse_db::MemoryStore;

const HOST: &str = "host@example.com";

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_cache(100)
    }

    fn with_cache(capacity: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(Repositories::from_store(store.clone()), capacity);
        let router = build_router(state, &ServerConfig::default());
        Self { router, store }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    async fn create_meeting(&self, id: &str, host: &str) {
        let (status, _) = self
            .post("/api/meetings", json!({"id": id, "createdBy": host, "title": "Sync"}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn submit_feedback(&self, meeting_id: &str, responses: Value) {
        let (status, _) = self
            .post(
                "/api/feedback",
                json!({"meetingId": meeting_id, "userId": "attendee@example.com", "responses": responses}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

// =============================================================================
// PROFILE
// =============================================================================

#[tokio::test]
async fn test_profile_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/profile/nobody@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "User not found"}));
}

#[tokio::test]
async fn test_profile_merges_computed_stats() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST, "name": "Ada"}))
        .await;
    app.create_meeting("m1", HOST).await;
    app.create_meeting("m2", HOST).await;
    app.submit_feedback("m1", json!({"q1": 5, "q2": 3, "comment": "ok", "onTime": true}))
        .await;
    app.submit_feedback("m2", json!({"q1": 4})).await;

    let (status, body) = app.get(&format!("/api/profile/{}", HOST)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], HOST);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["meetingsHosted"], 2);
    assert_eq!(body["avgRating"], 4.0);
}

#[tokio::test]
async fn test_profile_without_meetings_has_zero_stats() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;

    let (status, body) = app.get(&format!("/api/profile/{}", HOST)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meetingsHosted"], 0);
    assert_eq!(body["avgRating"], 0.0);
}

#[tokio::test]
async fn test_meetings_without_ratings_average_zero() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;
    app.create_meeting("m1", HOST).await;
    app.submit_feedback("m1", json!({"q1": 0, "q2": 7, "comment": "5"}))
        .await;

    let (_, body) = app.get(&format!("/api/profile/{}", HOST)).await;

    assert_eq!(body["meetingsHosted"], 1);
    assert_eq!(body["avgRating"], 0.0);
}

#[tokio::test]
async fn test_save_profile_requires_email() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/profile", json!({"name": "Ada"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Email is required"}));

    let (status, _) = app.post("/api/profile", json!({"email": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_profile_merges_fields() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST, "name": "Ada"}))
        .await;
    let (status, body) = app
        .post("/api/profile", json!({"email": HOST, "company": "Acme", "team": "core"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile saved");
    assert_eq!(body["profile"]["name"], "Ada");
    assert_eq!(body["profile"]["company"], "Acme");
    assert_eq!(body["profile"]["team"], "core");
}

#[tokio::test]
async fn test_client_supplied_stats_are_not_stored() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/api/profile",
            json!({"email": HOST, "_id": "abc", "meetingsHosted": 99, "avgRating": 5}),
        )
        .await;
    assert!(body["profile"].get("meetingsHosted").is_none());
    assert!(body["profile"].get("_id").is_none());

    let (_, body) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(body["meetingsHosted"], 0);
    assert_eq!(body["avgRating"], 0.0);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;
    app.store.set_unavailable(true);

    let (status, body) = app.get(&format!("/api/profile/{}", HOST)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Server error"}));
}

// =============================================================================
// STATS CACHE
// =============================================================================

#[tokio::test]
async fn test_new_feedback_invalidates_cached_stats() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;
    app.create_meeting("m1", HOST).await;
    app.submit_feedback("m1", json!({"q1": 2})).await;

    let (_, before) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(before["avgRating"], 2.0);

    app.submit_feedback("m1", json!({"q1": 4})).await;

    let (_, after) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(after["avgRating"], 3.0);
}

#[tokio::test]
async fn test_new_meeting_invalidates_cached_stats() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;
    app.create_meeting("m1", HOST).await;

    let (_, before) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(before["meetingsHosted"], 1);

    app.create_meeting("m2", HOST).await;

    let (_, after) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(after["meetingsHosted"], 2);
}

#[tokio::test]
async fn test_feedback_on_shared_meeting_id_invalidates_every_host() {
    const OTHER: &str = "b@example.com";
    let cached = TestApp::new();
    let uncached = TestApp::with_cache(0);

    for app in [&cached, &uncached] {
        app.post("/api/profile", json!({"email": OTHER})).await;
        app.create_meeting("shared", HOST).await;
        app.create_meeting("shared", OTHER).await;
        app.get(&format!("/api/profile/{}", OTHER)).await;
        app.submit_feedback("shared", json!({"overallSatisfaction": 4}))
            .await;
    }

    let (_, from_cache) = cached.get(&format!("/api/profile/{}", OTHER)).await;
    let (_, fresh) = uncached.get(&format!("/api/profile/{}", OTHER)).await;

    assert_eq!(fresh["avgRating"], 4.0);
    assert_eq!(from_cache["avgRating"], fresh["avgRating"]);
    assert_eq!(from_cache["meetingsHosted"], fresh["meetingsHosted"]);
}

#[tokio::test]
async fn test_uncached_reads_see_every_write() {
    let app = TestApp::with_cache(0);
    app.post("/api/profile", json!({"email": HOST})).await;
    app.create_meeting("m1", HOST).await;
    app.get(&format!("/api/profile/{}", HOST)).await;
    app.submit_feedback("m1", json!({"q1": 5})).await;

    let (_, body) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(body["avgRating"], 5.0);
}

// =============================================================================
// MEETINGS
// =============================================================================

#[tokio::test]
async fn test_create_meeting_requires_id_and_host() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/meetings", json!({"id": "m1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "Meeting ID and createdBy (userId) are required"})
    );

    let (status, _) = app.post("/api/meetings", json!({"createdBy": HOST})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_meeting_fills_ids_and_default_questions() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/meetings", json!({"id": "m1", "createdBy": HOST, "title": "Kickoff"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Meeting created");
    let meeting = &body["meeting"];
    assert_eq!(meeting["meetingId"], "m1");
    assert_eq!(meeting["userId"], HOST);
    assert_eq!(meeting["status"], "scheduled");
    assert_eq!(meeting["title"], "Kickoff");
    assert_eq!(meeting["feedbackQuestions"].as_array().unwrap().len(), 18);
}

#[tokio::test]
async fn test_create_meeting_keeps_custom_questions() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/api/meetings",
            json!({
                "id": "m1",
                "createdBy": HOST,
                "feedbackQuestions": [{"id": "q1", "type": "rating", "text": "How was it?"}]
            }),
        )
        .await;
    assert_eq!(body["meeting"]["feedbackQuestions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_meeting_rejects_unknown_status() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/meetings",
            json!({"id": "m1", "createdBy": HOST, "status": "postponed"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid meeting"));
}

#[tokio::test]
async fn test_numeric_meeting_ids_match_feedback() {
    let app = TestApp::new();
    app.post("/api/profile", json!({"email": HOST})).await;
    app.post("/api/meetings", json!({"id": 1712345678901_i64, "createdBy": HOST}))
        .await;
    app.post(
        "/api/feedback",
        json!({"meetingId": 1712345678901_i64, "userId": "a@example.com", "responses": {"q1": 3}}),
    )
    .await;

    let (_, body) = app.get(&format!("/api/profile/{}", HOST)).await;
    assert_eq!(body["meetingsHosted"], 1);
    assert_eq!(body["avgRating"], 3.0);
}

#[tokio::test]
async fn test_list_and_get_meetings() {
    let app = TestApp::new();
    app.create_meeting("m1", HOST).await;
    app.create_meeting("m2", "other@example.com").await;

    let (_, all) = app.get("/api/meetings").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["id"], "m1");

    let (_, hosted) = app.get(&format!("/api/meetings?createdBy={}", HOST)).await;
    assert_eq!(hosted.as_array().unwrap().len(), 1);

    let (status, meeting) = app.get("/api/meetings/m2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meeting["createdBy"], "other@example.com");

    let (status, body) = app.get("/api/meetings/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Meeting not found"}));
}

// =============================================================================
// FEEDBACK
// =============================================================================

#[tokio::test]
async fn test_create_feedback_requires_fields() {
    let app = TestApp::new();
    let expected = json!({"message": "meetingId, userId, and responses are required"});

    let (status, body) = app
        .post("/api/feedback", json!({"meetingId": "m1", "userId": "a@example.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    let (status, _) = app
        .post(
            "/api/feedback",
            json!({"meetingId": "m1", "userId": "a@example.com", "responses": "great"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_is_stored_with_timestamp() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/feedback",
            json!({"meetingId": "m1", "userId": "a@example.com", "responses": {"q1": 4}, "extra": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback saved");
    let feedback = &body["feedback"];
    assert!(feedback["id"].is_string());
    assert!(feedback["createdAt"].is_string());
    assert!(feedback.get("extra").is_none());
}

#[tokio::test]
async fn test_list_feedback_filters_by_meeting() {
    let app = TestApp::new();
    app.submit_feedback("m1", json!({"q1": 4})).await;
    app.submit_feedback("m2", json!({"q1": 2})).await;

    let (_, all) = app.get("/api/feedback").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, filtered) = app.get("/api/feedback?meetingId=m2").await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["meetingId"], "m2");
}

// =============================================================================
// AI INSIGHTS
// =============================================================================

#[tokio::test]
async fn test_insights_store_objects_only() {
    let app = TestApp::new();

    let (status, _) = app.post("/api/ai-insights", json!(["not", "an", "object"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/ai-insights", json!({"summary": "Shorter meetings", "score": 7}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI Insight saved");
    assert_eq!(body["insight"]["summary"], "Shorter meetings");

    let (_, all) = app.get("/api/ai-insights").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

// =============================================================================
// SYSTEM
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
