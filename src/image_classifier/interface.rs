use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// A loaded classification model. Output order is whatever the engine
/// produces; ranking happens downstream.
pub trait ImageClassifier: Send + Sync {
    fn classify(
        &self,
        image: &[u8],
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait ModelLoader: Send + Sync {
    fn load(
        &self,
        path: &Path,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>;
}
