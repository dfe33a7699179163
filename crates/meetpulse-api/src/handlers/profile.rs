//! Profile handlers.
//!
//! Profiles are stored without `meetingsHosted` / `avgRating`; the read path
//! merges freshly computed values into the response.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value as JsonValue};
use tracing::info;

use meetpulse_core::{JsonMap, ProfileWithStats, UserProfile};

use super::required_str;
use crate::{ApiError, AppState};

/// Fetch a profile together with its derived statistics.
#[utoipa::path(get, path = "/api/profile/{identity}", tag = "Profiles",
    params(("identity" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Stored profile with computed stats", body = ProfileWithStats),
        (status = 404, description = "No profile stored for this identity"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<ProfileWithStats>, ApiError> {
    let mut profile = state
        .repos
        .users
        .find_by_email(&identity)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    // Documents written before stats were derived may still carry them.
    profile.strip_derived_fields();

    let stats = state.stats.user_stats(&identity).await?;

    Ok(Json(ProfileWithStats { profile, stats }))
}

/// Create or update a profile by email.
#[utoipa::path(post, path = "/api/profile", tag = "Profiles",
    request_body = UserProfile,
    responses(
        (status = 200, description = "Profile saved"),
        (status = 400, description = "Email is missing"),
    )
)]
pub async fn save_profile(
    State(state): State<AppState>,
    Json(body): Json<JsonMap>,
) -> Result<Json<JsonValue>, ApiError> {
    if required_str(&body, "email").is_none() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let mut profile: UserProfile = serde_json::from_value(JsonValue::Object(body))
        .map_err(|e| ApiError::BadRequest(format!("Invalid profile: {}", e)))?;
    profile.strip_derived_fields();

    let stored = state.repos.users.upsert(profile).await?;
    info!(
        subsystem = "api",
        component = "profile",
        op = "save",
        email = %stored.email,
        "Profile saved"
    );

    Ok(Json(json!({
        "message": "Profile saved",
        "profile": stored,
    })))
}
