use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use breedscope_ai::ClassifyError;
use breedscope_core::RankError;
use breedscope_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Every way a request can fail, mapped to one status code and JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No image file provided")]
    NoImageProvided,

    #[error("No image selected")]
    NoImageSelected,

    #[error("Top prediction confidence is below 50%")]
    LowConfidence,

    #[error("Image and correct breed are required")]
    FeedbackFieldsMissing,

    #[error("Invalid breed name")]
    InvalidBreed,

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("request worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoImageProvided
            | Self::NoImageSelected
            | Self::LowConfidence
            | Self::FeedbackFieldsMissing
            | Self::InvalidBreed => StatusCode::BAD_REQUEST,
            Self::Classify(_)
            | Self::Rank(_)
            | Self::Store(_)
            | Self::Multipart(_)
            | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = %message, "request failed");
        } else {
            warn!(error = %message, "rejected request");
        }

        let body = match self {
            Self::LowConfidence => json!({ "status": "error", "error": message }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}
