//! Classifier adapter: turns uploaded image bytes into a breed probability vector.

mod classifier;
pub mod preprocess;

pub use classifier::{ClassifyError, ImageClassifier};

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
