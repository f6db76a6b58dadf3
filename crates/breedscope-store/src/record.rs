use serde::Serialize;

/// A correction about to be written.
#[derive(Debug, Clone, Copy)]
pub struct NewFeedback<'a> {
    pub image: &'a [u8],
    pub correct_breed: &'a str,
    /// Empty when the client did not say what was predicted.
    pub original_top_breed: &'a str,
}

/// A stored correction without its image blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackSummary {
    pub id: i64,
    pub correct_breed: String,
    pub original_top_breed: String,
    /// ISO 8601 timestamp string, assigned at insertion.
    pub timestamp: String,
    pub image_bytes: u64,
}
