//! HTTP service: `/predict` ranks breeds for an uploaded photo, `/feedback`
//! records a user-corrected label for later retraining.

mod error;
mod form;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
