//! Ranking and thresholding of classifier output.
//!
//! A probability vector becomes the top five breeds, highest first. When the
//! best breed scores below [`CONFIDENCE_THRESHOLD`] percent the ranking is
//! discarded and only the top confidence is reported.

use serde::Serialize;
use thiserror::Error;

use crate::labels::LabelCatalog;

/// Number of breeds returned per prediction.
pub const TOP_K: usize = 5;

/// Minimum top confidence, in percent, for a prediction to be returned.
pub const CONFIDENCE_THRESHOLD: f64 = 50.0;

/// One ranked breed with its confidence in percent, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub breed: String,
    pub confidence: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("model produced {got} scores but the label catalog has {expected} breeds")]
    LengthMismatch { expected: usize, got: usize },
}

/// Outcome of ranking one probability vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// Top breed met the threshold; predictions are sorted descending.
    Confident(Vec<Prediction>),
    /// Top breed fell short. The ranking is not kept.
    BelowThreshold { top_confidence: f64 },
}

/// Indices and scores of the `k` highest probabilities, highest first.
///
/// The sort is stable, so equal scores keep class-index order.
pub fn top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);
    ranked
}

/// Probability as a percentage rounded to two decimal places.
pub fn confidence_percent(p: f32) -> f64 {
    (f64::from(p) * 100.0 * 100.0).round() / 100.0
}

/// Rank a probability vector against the catalog and apply the threshold.
pub fn assess(catalog: &LabelCatalog, probs: &[f32]) -> Result<Assessment, RankError> {
    if probs.len() != catalog.len() {
        return Err(RankError::LengthMismatch {
            expected: catalog.len(),
            got: probs.len(),
        });
    }

    let ranked = top_k(probs, TOP_K);
    let top_confidence = ranked
        .first()
        .map(|&(_, p)| f64::from(p) * 100.0)
        .unwrap_or(0.0);

    if top_confidence < CONFIDENCE_THRESHOLD {
        return Ok(Assessment::BelowThreshold { top_confidence });
    }

    let predictions = ranked
        .into_iter()
        .filter_map(|(index, p)| {
            catalog.get(index).map(|breed| Prediction {
                breed: breed.to_string(),
                confidence: confidence_percent(p),
            })
        })
        .collect();

    Ok(Assessment::Confident(predictions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> LabelCatalog {
        let text: Vec<String> = (0..n).map(|i| format!("breed_{i}")).collect();
        LabelCatalog::from_text(&text.join("\n")).unwrap()
    }

    #[test]
    fn top_k_sorts_descending() {
        let ranked = top_k(&[0.1, 0.4, 0.05, 0.3, 0.15], 3);
        let indices: Vec<usize> = ranked.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, vec![1, 3, 4]);
    }

    #[test]
    fn top_k_ties_keep_index_order() {
        let ranked = top_k(&[0.2, 0.3, 0.2, 0.3], 4);
        let indices: Vec<usize> = ranked.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, vec![1, 3, 0, 2]);
    }

    #[test]
    fn top_k_shorter_than_k() {
        assert_eq!(top_k(&[0.7, 0.3], 5).len(), 2);
    }

    #[test]
    fn confidence_rounds_to_two_places() {
        assert_eq!(confidence_percent(0.87654), 87.65);
        assert_eq!(confidence_percent(1.0), 100.0);
        assert_eq!(confidence_percent(0.0), 0.0);
    }

    #[test]
    fn confident_prediction_returns_five_sorted() {
        let labels = catalog(8);
        let probs = [0.01, 0.02, 0.8, 0.05, 0.03, 0.04, 0.025, 0.025];
        let Assessment::Confident(predictions) = assess(&labels, &probs).unwrap() else {
            panic!("expected a confident prediction");
        };

        assert_eq!(predictions.len(), TOP_K);
        assert_eq!(predictions[0].breed, "breed_2");
        assert_eq!(predictions[0].confidence, 80.0);
        for pair in predictions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for p in &predictions {
            assert!((0.0..=100.0).contains(&p.confidence));
            assert_eq!((p.confidence * 100.0).round() / 100.0, p.confidence);
        }
        let total: f64 = predictions.iter().map(|p| p.confidence).sum();
        assert!(total <= 100.0, "confidences sum to {total}");
    }

    #[test]
    fn exactly_fifty_percent_passes() {
        let labels = catalog(6);
        let probs = [0.5, 0.1, 0.1, 0.1, 0.1, 0.1];
        assert!(matches!(
            assess(&labels, &probs).unwrap(),
            Assessment::Confident(_)
        ));
    }

    #[test]
    fn low_confidence_is_discarded() {
        let labels = catalog(6);
        let probs = [0.3, 0.2, 0.2, 0.1, 0.1, 0.1];
        match assess(&labels, &probs).unwrap() {
            Assessment::BelowThreshold { top_confidence } => {
                assert!((top_confidence - 30.0).abs() < 1e-4);
            }
            other => panic!("expected below-threshold, got {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_errors() {
        let labels = catalog(3);
        assert_eq!(
            assess(&labels, &[0.9, 0.1]),
            Err(RankError::LengthMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn prediction_serializes_as_breed_and_confidence() {
        let p = Prediction {
            breed: "Pug".into(),
            confidence: 91.25,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({"breed": "Pug", "confidence": 91.25}));
    }
}
