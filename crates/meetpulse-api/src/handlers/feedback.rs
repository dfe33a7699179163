//! Feedback handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::info;

use meetpulse_core::{CreateFeedbackRequest, Feedback, JsonMap};

use super::{required_id, required_str};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListFeedbackQuery {
    #[serde(rename = "meetingId")]
    pub meeting_id: Option<String>,
}

/// Record an attendee's answers for a meeting.
///
/// Only `meetingId`, `userId` and `responses` are stored; the store assigns
/// the id and `createdAt`.
#[utoipa::path(post, path = "/api/feedback", tag = "Feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback saved"),
        (status = 400, description = "Missing meetingId, userId or responses"),
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(body): Json<JsonMap>,
) -> Result<Json<JsonValue>, ApiError> {
    let meeting_id = required_id(&body, "meetingId");
    let user_id = required_str(&body, "userId").map(str::to_string);
    let responses = body.get("responses").and_then(JsonValue::as_object).cloned();

    let req = match (meeting_id, user_id, responses) {
        (Some(meeting_id), Some(user_id), Some(responses)) => CreateFeedbackRequest {
            meeting_id,
            user_id,
            responses,
        },
        _ => {
            return Err(ApiError::BadRequest(
                "meetingId, userId, and responses are required".to_string(),
            ))
        }
    };

    let stored = state.repos.feedback.insert(req).await?;
    state.stats.feedback_created(&stored).await;

    info!(
        subsystem = "api",
        component = "feedback",
        op = "create",
        meeting_id = %stored.meeting_id,
        response_count = stored.responses.len(),
        "Feedback saved"
    );

    Ok(Json(json!({
        "message": "Feedback saved",
        "feedback": stored,
    })))
}

/// List feedback in submission order.
#[utoipa::path(get, path = "/api/feedback", tag = "Feedback",
    params(("meetingId" = Option<String>, Query, description = "Only feedback for this meeting")),
    responses((status = 200, description = "Feedback records", body = [Feedback]))
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    let feedback = match query.meeting_id.filter(|m| !m.is_empty()) {
        Some(meeting_id) => state.repos.feedback.list_for_meetings(&[meeting_id]).await?,
        None => state.repos.feedback.list().await?,
    };
    Ok(Json(feedback))
}
