//! User statistics aggregation.
//!
//! Derives `meetingsHosted` and `avgRating` for an identity by scanning the
//! meetings it hosts and the feedback left on them. Nothing here writes to
//! the store; the result is a pure function of what the reads return.
//!
//! Ratings are discovered by value shape: any numeric response in `1..=5`
//! counts, whatever question it answers. Booleans and strings never count.

use std::collections::BTreeSet;
use std::time::Instant;

use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::error::Result;
use crate::models::{Feedback, Meeting, UserStats};
use crate::traits::{FeedbackRepository, MeetingRepository};

/// Lowest answer counted as a rating.
pub const MIN_RATING: f64 = 1.0;

/// Highest answer counted as a rating.
pub const MAX_RATING: f64 = 5.0;

/// Return the rating carried by a response value, if it is one.
///
/// Only JSON numbers in `MIN_RATING..=MAX_RATING` qualify.
pub fn rating_value(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .filter(|v| (MIN_RATING..=MAX_RATING).contains(v)),
        _ => None,
    }
}

/// Ids that feedback may use to reference the given meetings.
///
/// Sorted and de-duplicated; meetings with neither id are skipped.
pub fn candidate_meeting_ids(meetings: &[Meeting]) -> Vec<String> {
    meetings
        .iter()
        .filter_map(Meeting::candidate_id)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Flatten every rating found in the feedback responses.
pub fn collect_ratings<'a, I>(feedback: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Feedback>,
{
    let mut ratings = Vec::new();
    let mut skipped = 0usize;

    for fb in feedback {
        for value in fb.responses.values() {
            match rating_value(value) {
                Some(rating) => ratings.push(rating),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        trace!(
            subsystem = "stats",
            component = "aggregator",
            skipped_count = skipped,
            rating_count = ratings.len(),
            "Excluded non-rating response values"
        );
    }

    ratings
}

/// Round to two decimal places, halves away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean of `ratings` rounded to two decimals, or `0` when empty.
pub fn average_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().sum();
    round_to_hundredths(sum / ratings.len() as f64)
}

/// Compute the statistics for `identity` from the given store capabilities.
///
/// Issues three reads (count, hosted meetings, matching feedback). Store
/// errors are returned as-is.
pub async fn compute_user_stats(
    meetings: &dyn MeetingRepository,
    feedback: &dyn FeedbackRepository,
    identity: &str,
) -> Result<UserStats> {
    let start = Instant::now();

    let meetings_hosted = meetings.count_hosted_by(identity).await?;
    let hosted = meetings.list_hosted_by(identity).await?;
    let meeting_ids = candidate_meeting_ids(&hosted);

    let relevant = if meeting_ids.is_empty() {
        Vec::new()
    } else {
        feedback.list_for_meetings(&meeting_ids).await?
    };

    let ratings = collect_ratings(&relevant);
    let stats = UserStats {
        meetings_hosted,
        avg_rating: average_rating(&ratings),
    };

    debug!(
        subsystem = "stats",
        component = "aggregator",
        op = "compute",
        identity = %identity,
        meetings_hosted = stats.meetings_hosted,
        result_count = relevant.len(),
        rating_count = ratings.len(),
        avg_rating = stats.avg_rating,
        duration_ms = start.elapsed().as_millis() as u64,
        "Computed user stats"
    );

    Ok(stats)
}
