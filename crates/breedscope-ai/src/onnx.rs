//! ONNX Runtime backend for the breed classifier.
//!
//! Expects a single-input, single-output image classification graph taking a
//! `[1, 224, 224, 3]` float tensor and producing `[1, num_breeds]`
//! probabilities (softmax already applied).

use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::preprocess;
use crate::{ClassifyError, ImageClassifier};

/// Breed classifier backed by an ONNX Runtime session.
///
/// The session is loaded once and reused for every request. Running it needs
/// exclusive access, so calls are serialised through a mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    num_breeds: usize,
}

impl OnnxClassifier {
    /// Load a model file whose output width must equal `num_breeds`.
    pub fn load(model_path: &Path, num_breeds: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.exists(), "model not found at {model_path:?}");

        let session = Session::builder()?.commit_from_file(model_path)?;

        if let Some(dim) = infer_classes(session.outputs()[0].dtype()) {
            anyhow::ensure!(
                dim == num_breeds,
                "model outputs {dim} classes but the label catalog has {num_breeds} breeds"
            );
        }

        info!(breeds = num_breeds, model = %model_path.display(), "loaded breed classifier");
        Ok(Self {
            session: Mutex::new(session),
            num_breeds,
        })
    }

    pub fn num_breeds(&self) -> usize {
        self.num_breeds
    }
}

impl ImageClassifier for OnnxClassifier {
    fn classify(&self, image: &[u8]) -> Result<Vec<f32>, ClassifyError> {
        let input = preprocess::preprocess(image)?;
        let shape = input.shape.map(|d| d as i64);
        let tensor =
            Tensor::from_array((shape, input.data.into_boxed_slice())).map_err(model_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::Model("inference session poisoned".into()))?;
        let outputs = session.run(ort::inputs![tensor]).map_err(model_error)?;

        let (output_shape, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(model_error)?;
        let dims: &[i64] = output_shape;
        if output_data.len() != self.num_breeds {
            return Err(ClassifyError::Model(format!(
                "unexpected output shape: {dims:?}, expected [1, {}]",
                self.num_breeds
            )));
        }

        debug!(dims = ?dims, "ran breed classifier");
        Ok(output_data.to_vec())
    }
}

fn model_error(e: impl Display) -> ClassifyError {
    ClassifyError::Model(e.to_string())
}

/// Try to infer the number of classes from the ONNX model output type.
fn infer_classes(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("dog_breed_classifier.onnx")
    }

    fn breed_count() -> usize {
        let labels = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("breed_names.txt");
        breedscope_core::LabelCatalog::load(&labels).unwrap().len()
    }

    #[test]
    fn load_missing_model_errors() {
        let result = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), 120);
        assert!(result.is_err());
    }

    #[test]
    #[ignore = "needs models/dog_breed_classifier.onnx and breed_names.txt"]
    fn classify_returns_probabilities() {
        use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
        use std::io::Cursor;

        let n = breed_count();
        let classifier = OnnxClassifier::load(&model_path(), n).unwrap();

        let img = RgbImage::from_pixel(300, 300, Rgb([120, 90, 60]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();

        let probs = classifier.classify(buf.get_ref()).unwrap();
        assert_eq!(probs.len(), n);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-3, "expected softmax output, sum {total}");
    }

    #[test]
    #[ignore = "needs models/dog_breed_classifier.onnx and breed_names.txt"]
    fn classify_rejects_non_image() {
        let classifier = OnnxClassifier::load(&model_path(), breed_count()).unwrap();
        let result = classifier.classify(b"plain text");
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }
}
