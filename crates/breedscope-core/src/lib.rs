pub mod labels;
pub mod prediction;

pub use labels::{CatalogError, LabelCatalog};
pub use prediction::{
    Assessment, CONFIDENCE_THRESHOLD, Prediction, RankError, TOP_K, assess, confidence_percent,
    top_k,
};
