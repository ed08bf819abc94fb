use crate::image_classifier::interface::{Classification, ImageClassifier, ModelLoader};
use crate::library::logger::interface::Logger;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;

/// Stand-in engine: scores every known label with pseudo-random confidences
/// seeded from the image bytes, so the same photo always gets the same answer.
pub struct ImageClassifierFake {
    labels: Vec<String>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            labels,
            logger: logger.with_namespace("classifier").with_namespace("fake"),
        }
    }
}

fn seed_of(bytes: &[u8]) -> u64 {
    // FNV-1a
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &[u8],
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Classifying {} bytes...", image.len()))?;

        let mut rng = StdRng::seed_from_u64(seed_of(image));
        let weights: Vec<f32> = self
            .labels
            .iter()
            .map(|_| rng.random::<f32>().powi(4))
            .collect();
        let total: f32 = weights.iter().sum();

        let classifications = self
            .labels
            .iter()
            .zip(weights)
            .map(|(label, weight)| Classification {
                label: label.clone(),
                confidence: if total > 0.0 { weight / total } else { 0.0 },
            })
            .collect();

        Ok(classifications)
    }
}

/// Loads a label-list "model": one label per line, blank lines and `#`
/// comments ignored.
pub struct ModelLoaderFake {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelLoaderFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self { logger }
    }
}

pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

impl ModelLoader for ModelLoaderFake {
    fn load(
        &self,
        path: &Path,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
    {
        let contents = std::fs::read_to_string(path)?;
        let labels = parse_labels(&contents);
        if labels.is_empty() {
            return Err(format!("{} declares no labels", path.display()).into());
        }

        self.logger.info(&format!(
            "Loaded {} labels from {}",
            labels.len(),
            path.display()
        ))?;

        Ok(Arc::new(ImageClassifierFake::new(labels, self.logger.clone())))
    }
}
