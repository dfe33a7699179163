//! Default feedback form attached to meetings created without custom questions.

use crate::models::{FeedbackQuestion, QuestionType};

const RATING_QUESTIONS: [(&str, &str); 9] = [
    ("meetingObjectiveClarity", "Meeting Objective Clarity"),
    ("contentRelevance", "Content Relevance"),
    ("overallEngagement", "Overall Engagement"),
    ("timeUtilization", "Time Utilization"),
    ("focusTopicManagement", "Focus & Topic Management"),
    ("decisionQuality", "Decision Quality"),
    ("overallSatisfaction", "Overall Satisfaction"),
    ("facilitatorEffectiveness", "Facilitator Effectiveness"),
    ("technicalSetup", "Technical Setup"),
];

const BOOLEAN_QUESTIONS: [(&str, &str); 5] = [
    (
        "agendaSharedInAdvance",
        "Was the meeting agenda shared in advance?",
    ),
    ("unnecessaryAttendees", "Were there unnecessary attendees?"),
    ("actionItemsAssigned", "Were action items clearly assigned?"),
    ("meetingRecorded", "Was the meeting recorded?"),
    ("preparedBeforeMeeting", "Did you prepare before the meeting?"),
];

const TEXT_QUESTIONS: [(&str, &str); 4] = [
    ("improvementAreas", "What could have been improved?"),
    ("futureSuggestions", "Any suggestions for future meetings?"),
    ("valuableAspect", "What was the most valuable aspect?"),
    ("leastValuableAspect", "What was the least valuable aspect?"),
];

/// The standard 18-question form: ratings first, then yes/no, then free text.
pub fn default_feedback_questions() -> Vec<FeedbackQuestion> {
    let rating = RATING_QUESTIONS
        .iter()
        .map(|(id, text)| FeedbackQuestion::new(id, QuestionType::Rating, text));
    let boolean = BOOLEAN_QUESTIONS
        .iter()
        .map(|(id, text)| FeedbackQuestion::new(id, QuestionType::Boolean, text));
    let text = TEXT_QUESTIONS
        .iter()
        .map(|(id, text)| FeedbackQuestion::new(id, QuestionType::Text, text));

    rating.chain(boolean).chain(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_form_shape() {
        let questions = default_feedback_questions();
        assert_eq!(questions.len(), 18);

        let count = |t: QuestionType| questions.iter().filter(|q| q.question_type == t).count();
        assert_eq!(count(QuestionType::Rating), 9);
        assert_eq!(count(QuestionType::Boolean), 5);
        assert_eq!(count(QuestionType::Text), 4);
    }

    #[test]
    fn test_default_question_ids_unique() {
        let questions = default_feedback_questions();
        let ids: HashSet<_> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), questions.len());
        assert_eq!(questions[0].id, "meetingObjectiveClarity");
    }
}
