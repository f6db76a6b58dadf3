use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("model inference failed: {0}")]
    Model(String),
}

/// A model that scores one image against the breed catalog.
///
/// Implementations return one probability per catalog entry, in catalog order.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> Result<Vec<f32>, ClassifyError>;
}
