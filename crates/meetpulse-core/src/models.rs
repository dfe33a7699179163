//! Core data models for meetpulse.
//!
//! Records are persisted as schema-less documents. Each model names the fields
//! the service relies on and keeps every other key in a flattened `extra` map
//! so round-tripping a document through the API never drops attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Free-form JSON object used for schema-less document fields.
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// Profile keys that are derived at read time and never persisted.
pub const DERIVED_PROFILE_FIELDS: [&str; 2] = ["meetingsHosted", "avgRating"];

/// Storage-engine keys a client may echo back but must not write.
pub const STORAGE_ID_FIELD: &str = "_id";

/// Merge `update` into `target` key by key (top-level `$set` semantics).
///
/// Keys present in `update` replace those in `target`; keys absent from
/// `update` are left untouched.
pub fn merge_documents(target: &mut JsonMap, update: JsonMap) {
    for (key, value) in update {
        target.insert(key, value);
    }
}

/// String form of a stored id: strings as-is, numbers in decimal. Other
/// values (booleans, objects, null) carry no usable id.
pub fn id_from_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Documents written by other clients may hold numeric ids; those must not
// make a whole collection scan fail.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(id_from_value(&value).unwrap_or_default())
}

fn lenient_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(id_from_value(&value))
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A user profile keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Any other profile attributes supplied by the client.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: JsonMap,
}

impl UserProfile {
    /// Create an otherwise empty profile for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            company: None,
            position: None,
            department: None,
            extra: JsonMap::new(),
        }
    }

    /// Remove keys that must never be stored: the storage engine's own id and
    /// the denormalized statistics that are recomputed on every read.
    pub fn strip_derived_fields(&mut self) {
        self.extra.remove(STORAGE_ID_FIELD);
        for key in DERIVED_PROFILE_FIELDS {
            self.extra.remove(key);
        }
    }

    /// Serialize into a JSON object document.
    pub fn to_document(&self) -> crate::Result<JsonMap> {
        match serde_json::to_value(self)? {
            JsonValue::Object(map) => Ok(map),
            other => Err(crate::Error::Serialization(format!(
                "profile serialized to non-object: {}",
                other
            ))),
        }
    }
}

/// Derived statistics for a user, recomputed from meetings and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of meetings whose `createdBy` equals the identity.
    pub meetings_hosted: i64,
    /// Mean of all 1–5 numeric answers on those meetings, two decimals.
    /// `0` means "no ratings yet", not a low score.
    pub avg_rating: f64,
}

impl UserStats {
    /// Stats for an identity with no hosted meetings or no ratings.
    pub const EMPTY: UserStats = UserStats {
        meetings_hosted: 0,
        avg_rating: 0.0,
    };
}

/// Stored profile merged with freshly computed stats (profile endpoint body).
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProfileWithStats {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(flatten)]
    pub stats: UserStats,
}

// =============================================================================
// MEETING TYPES
// =============================================================================

/// Lifecycle status of a meeting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Scheduled => write!(f, "scheduled"),
            MeetingStatus::Completed => write!(f, "completed"),
            MeetingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for MeetingStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MeetingStatus::Scheduled),
            "completed" => Ok(MeetingStatus::Completed),
            "cancelled" => Ok(MeetingStatus::Cancelled),
            _ => Err(crate::Error::InvalidInput(format!(
                "unknown meeting status: {}",
                s
            ))),
        }
    }
}

/// Declared answer type of a feedback question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Numeric answer in 1..=5.
    Rating,
    /// Yes/no answer.
    Boolean,
    /// Free text answer.
    Text,
}

/// A single question on a meeting's feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
}

impl FeedbackQuestion {
    pub fn new(id: &str, question_type: QuestionType, text: &str) -> Self {
        Self {
            id: id.to_string(),
            question_type,
            text: text.to_string(),
        }
    }
}

/// A scheduled meeting.
///
/// `id` and `meeting_id` carry the same value for meetings created through
/// the API; lookups accept either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub meeting_id: Option<String>,
    /// Hosting identity.
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: MeetingStatus,
    #[serde(default)]
    pub feedback_questions: Vec<FeedbackQuestion>,
    /// Title, description, attendees and any other client-supplied keys.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: JsonMap,
}

impl Meeting {
    /// Create a meeting hosted by `created_by` with both id fields populated.
    pub fn new(id: impl Into<String>, created_by: impl Into<String>) -> Self {
        let id = id.into();
        let created_by = created_by.into();
        Self {
            meeting_id: Some(id.clone()),
            user_id: Some(created_by.clone()),
            id,
            created_by,
            date: None,
            start_time: None,
            end_time: None,
            status: MeetingStatus::default(),
            feedback_questions: Vec::new(),
            extra: JsonMap::new(),
        }
    }

    /// The id feedback records use to reference this meeting: `meetingId`
    /// when present and non-empty, otherwise `id`.
    pub fn candidate_id(&self) -> Option<&str> {
        self.meeting_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.id.as_str()).filter(|id| !id.is_empty()))
    }

    /// True when `id` matches either of the meeting's id fields.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.meeting_id.as_deref() == Some(id)
    }
}

// =============================================================================
// FEEDBACK TYPES
// =============================================================================

/// An attendee's answers for one meeting. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Storage-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub meeting_id: String,
    #[serde(default)]
    pub user_id: String,
    /// Question id → answer (number, boolean, or string).
    #[serde(default)]
    #[schema(value_type = Object)]
    pub responses: JsonMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request for recording a feedback submission.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub meeting_id: String,
    pub user_id: String,
    #[schema(value_type = Object)]
    pub responses: JsonMap,
}

impl CreateFeedbackRequest {
    /// Materialize the stored record with a fresh id and timestamp.
    pub fn into_feedback(self, id: Uuid, created_at: DateTime<Utc>) -> Feedback {
        Feedback {
            id: Some(id),
            meeting_id: self.meeting_id,
            user_id: self.user_id,
            responses: self.responses,
            created_at: Some(created_at),
        }
    }
}

// =============================================================================
// AI INSIGHT TYPES
// =============================================================================

/// A stored AI-generated insight. The content is opaque to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub content: JsonMap,
}

impl AiInsight {
    /// Build an insight record, dropping any client-supplied `id`/`createdAt`.
    pub fn new(id: Uuid, created_at: DateTime<Utc>, mut content: JsonMap) -> Self {
        content.remove("id");
        content.remove("createdAt");
        content.remove(STORAGE_ID_FIELD);
        Self {
            id,
            created_at,
            content,
        }
    }
}
