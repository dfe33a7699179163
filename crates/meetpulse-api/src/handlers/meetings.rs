//! Meeting handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::info;

use meetpulse_core::{default_feedback_questions, JsonMap, Meeting};

use super::{required_id, required_str};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListMeetingsQuery {
    #[serde(rename = "createdBy")]
    pub created_by: Option<String>,
}

/// Schedule a meeting.
///
/// `userId` is set to `createdBy` and `meetingId` to `id`. Meetings created
/// without questions get the default feedback form.
#[utoipa::path(post, path = "/api/meetings", tag = "Meetings",
    request_body = Meeting,
    responses(
        (status = 200, description = "Meeting created"),
        (status = 400, description = "Missing id or createdBy, or malformed meeting"),
    )
)]
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(mut body): Json<JsonMap>,
) -> Result<Json<JsonValue>, ApiError> {
    let (id, created_by) = match (
        required_id(&body, "id"),
        required_str(&body, "createdBy").map(str::to_string),
    ) {
        (Some(id), Some(created_by)) => (id, created_by),
        _ => {
            return Err(ApiError::BadRequest(
                "Meeting ID and createdBy (userId) are required".to_string(),
            ))
        }
    };

    body.insert("id".to_string(), JsonValue::String(id.clone()));
    body.insert("userId".to_string(), JsonValue::String(created_by));
    body.insert("meetingId".to_string(), JsonValue::String(id));

    let has_questions = body
        .get("feedbackQuestions")
        .and_then(JsonValue::as_array)
        .is_some_and(|q| !q.is_empty());
    if !has_questions {
        body.insert(
            "feedbackQuestions".to_string(),
            serde_json::to_value(default_feedback_questions())
                .map_err(meetpulse_core::Error::from)?,
        );
    }

    let meeting: Meeting = serde_json::from_value(JsonValue::Object(body))
        .map_err(|e| ApiError::BadRequest(format!("Invalid meeting: {}", e)))?;

    let stored = state.repos.meetings.insert(meeting).await?;
    state.stats.meeting_created(&stored).await;

    info!(
        subsystem = "api",
        component = "meetings",
        op = "create",
        meeting_id = %stored.id,
        created_by = %stored.created_by,
        question_count = stored.feedback_questions.len(),
        "Meeting created"
    );

    Ok(Json(json!({
        "message": "Meeting created",
        "meeting": stored,
    })))
}

/// List meetings in creation order.
#[utoipa::path(get, path = "/api/meetings", tag = "Meetings",
    params(("createdBy" = Option<String>, Query, description = "Only meetings hosted by this identity")),
    responses((status = 200, description = "Meetings", body = [Meeting]))
)]
pub async fn list_meetings(
    State(state): State<AppState>,
    Query(query): Query<ListMeetingsQuery>,
) -> Result<Json<Vec<Meeting>>, ApiError> {
    let meetings = match query.created_by.as_deref().filter(|c| !c.is_empty()) {
        Some(host) => state.repos.meetings.list_hosted_by(host).await?,
        None => state.repos.meetings.list().await?,
    };
    Ok(Json(meetings))
}

/// Fetch a meeting by `id` or `meetingId`.
#[utoipa::path(get, path = "/api/meetings/{id}", tag = "Meetings",
    params(("id" = String, Path, description = "Meeting id or meetingId")),
    responses(
        (status = 200, description = "Meeting", body = Meeting),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, ApiError> {
    state
        .repos
        .meetings
        .find(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))
}
