//! OpenAPI document served at `/api-docs/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::handlers;
use meetpulse_core::{
    AiInsight, CreateFeedbackRequest, Feedback, FeedbackQuestion, Meeting, MeetingStatus,
    ProfileWithStats, QuestionType, UserProfile, UserStats,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meetpulse API",
        description = "Meeting feedback tracker: profiles, meetings, feedback, and derived host statistics"
    ),
    paths(
        handlers::health::health_check,
        handlers::profile::get_profile,
        handlers::profile::save_profile,
        handlers::meetings::create_meeting,
        handlers::meetings::list_meetings,
        handlers::meetings::get_meeting,
        handlers::feedback::create_feedback,
        handlers::feedback::list_feedback,
        handlers::insights::create_insight,
        handlers::insights::list_insights,
    ),
    components(schemas(
        UserProfile,
        UserStats,
        ProfileWithStats,
        Meeting,
        MeetingStatus,
        FeedbackQuestion,
        QuestionType,
        Feedback,
        CreateFeedbackRequest,
        AiInsight,
    )),
    tags(
        (name = "Profiles", description = "User profiles with derived statistics"),
        (name = "Meetings", description = "Meeting scheduling"),
        (name = "Feedback", description = "Attendee feedback"),
        (name = "Insights", description = "Stored AI insights"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_profile_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/profile/{identity}"));
        assert!(doc.paths.paths.contains_key("/api/meetings"));
    }
}
