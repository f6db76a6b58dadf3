use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use breedscope_core::{Assessment, Prediction, assess};
use breedscope_store::NewFeedback;
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::form::UploadForm;
use crate::{ApiError, AppState};

/// Build the service router.
///
/// Uploads are buffered whole and no body size limit is applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/feedback", post(feedback))
        .route("/health", get(health))
        .route("/breeds", get(breeds))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    status: &'static str,
    predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
struct FeedbackResponse {
    status: &'static str,
    message: &'static str,
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_file("image").ok_or(ApiError::NoImageProvided)?;
    if image.file_name.is_empty() {
        return Err(ApiError::NoImageSelected);
    }

    let classifier = Arc::clone(&state.classifier);
    let probs = tokio::task::spawn_blocking(move || classifier.classify(&image.bytes)).await??;

    match assess(&state.catalog, &probs)? {
        Assessment::Confident(predictions) => {
            if let Some(top) = predictions.first() {
                info!(breed = %top.breed, confidence = top.confidence, "served prediction");
            }
            Ok(Json(PredictResponse {
                status: "success",
                predictions,
            }))
        }
        Assessment::BelowThreshold { top_confidence } => {
            warn!(top_confidence, "prediction below confidence threshold");
            Err(ApiError::LowConfidence)
        }
    }
}

async fn feedback(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let (Some(image), Some(correct_breed)) =
        (form.take_file("image"), form.take_field("correct_breed"))
    else {
        return Err(ApiError::FeedbackFieldsMissing);
    };
    let original_top_breed = form.take_field("original_top_breed").unwrap_or_default();

    if !state.catalog.contains(&correct_breed) {
        return Err(ApiError::InvalidBreed);
    }

    let store = Arc::clone(&state.store);
    let (id, correct_breed) = tokio::task::spawn_blocking(move || {
        store
            .insert(&NewFeedback {
                image: &image.bytes,
                correct_breed: &correct_breed,
                original_top_breed: &original_top_breed,
            })
            .map(|id| (id, correct_breed))
    })
    .await??;

    info!(id, breed = %correct_breed, "recorded feedback");
    Ok(Json(FeedbackResponse {
        status: "success",
        message: "Feedback submitted successfully",
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "breeds": state.catalog.len() }))
}

async fn breeds(State(state): State<AppState>) -> Json<Value> {
    let breeds: Vec<&str> = state.catalog.iter().collect();
    Json(json!({ "breeds": breeds }))
}
