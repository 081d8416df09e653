use serde::Serialize;

/// One contestant's predicted rating delta for a contest.
///
/// `update_time_seconds` serializes as `ratingUpdateTimeSeconds` on the
/// wire even though the internal model field follows Rust naming — it
/// mirrors the upstream Codeforces API's own field name.
#[derive(Debug, Clone, Serialize)]
pub struct RatingChange {
    #[serde(rename = "contestId")]
    pub contest_id: i64,
    pub handle: String,
    #[serde(rename = "ratingUpdateTimeSeconds")]
    pub update_time_seconds: i64,
    #[serde(rename = "oldRating")]
    pub old_rating: i32,
    #[serde(rename = "newRating")]
    pub new_rating: i32,
}
