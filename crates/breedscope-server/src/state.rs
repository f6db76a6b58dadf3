use std::sync::Arc;

use breedscope_ai::ImageClassifier;
use breedscope_core::LabelCatalog;
use breedscope_store::FeedbackStore;

/// Process-wide handles shared by every request.
///
/// Built once before the listener starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<LabelCatalog>,
    pub classifier: Arc<dyn ImageClassifier>,
    pub store: Arc<FeedbackStore>,
}

impl AppState {
    pub fn new(
        catalog: LabelCatalog,
        classifier: impl ImageClassifier + 'static,
        store: FeedbackStore,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            classifier: Arc::new(classifier),
            store: Arc::new(store),
        }
    }
}
