//! AI insight storage. Content is stored as given; nothing is generated here.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value as JsonValue};
use tracing::info;

use meetpulse_core::AiInsight;

use crate::{ApiError, AppState};

#[utoipa::path(post, path = "/api/ai-insights", tag = "Insights",
    responses(
        (status = 200, description = "AI Insight saved"),
        (status = 400, description = "Body is not a JSON object"),
    )
)]
pub async fn create_insight(
    State(state): State<AppState>,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, ApiError> {
    let JsonValue::Object(content) = body else {
        return Err(ApiError::BadRequest(
            "AI insight must be a JSON object".to_string(),
        ));
    };

    let stored = state.repos.insights.insert(content).await?;
    info!(
        subsystem = "api",
        component = "insights",
        op = "create",
        insight_id = %stored.id,
        "AI insight saved"
    );

    Ok(Json(json!({
        "message": "AI Insight saved",
        "insight": stored,
    })))
}

#[utoipa::path(get, path = "/api/ai-insights", tag = "Insights",
    responses((status = 200, description = "Stored insights", body = [AiInsight])))]
pub async fn list_insights(
    State(state): State<AppState>,
) -> Result<Json<Vec<AiInsight>>, ApiError> {
    Ok(Json(state.repos.insights.list().await?))
}
