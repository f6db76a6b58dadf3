//! Storage layer: DuckDB table of user-corrected breed labels.

mod error;
pub use error::StoreError;

mod record;
pub use record::{FeedbackSummary, NewFeedback};

#[cfg(feature = "duckdb")]
mod feedback;
#[cfg(feature = "duckdb")]
pub use feedback::FeedbackStore;
