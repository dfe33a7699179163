//! # meetpulse-core
//!
//! Core types, traits, and abstractions for the meetpulse feedback tracker.
//!
//! This crate provides the document models (users, meetings, feedback), the
//! repository traits every store backend implements, and the user statistics
//! aggregator that derives `meetingsHosted` / `avgRating` at read time.

pub mod defaults;
pub mod error;
pub mod models;
pub mod stats;
pub mod traits;

// Re-export commonly used types at crate root
pub use defaults::default_feedback_questions;
pub use error::{Error, Result};
pub use models::*;
pub use stats::{
    average_rating, candidate_meeting_ids, collect_ratings, compute_user_stats, rating_value,
    round_to_hundredths, MAX_RATING, MIN_RATING,
};
pub use traits::*;

/// Generate a new time-ordered UUIDv7 for storage-assigned record ids.
pub fn new_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
