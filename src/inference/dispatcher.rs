use crate::config::ModelConfig;
use crate::error::{ConfigError, InferenceError};
use crate::image_classifier::interface::{ImageClassifier, ModelLoader};
use crate::inference::ranking::ClassificationResult;
use crate::library::logger::interface::Logger;
use crate::model_bundle::ModelBundle;
use crate::still_capture::controller::CapturedImage;
use std::sync::Arc;

enum Engine {
    Loaded(Arc<dyn ImageClassifier + Send + Sync>),
    Unavailable(ConfigError),
}

/// Runs captured stills through the model. The model is loaded once; if that
/// fails every `classify` returns `ModelUnavailable` for the dispatcher's lifetime.
pub struct InferenceDispatcher {
    engine: Engine,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceDispatcher {
    pub fn load(
        model: &ModelConfig,
        loader: &dyn ModelLoader,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("inference");
        let bundle = ModelBundle::new(&model.bundle_dir);

        let engine = bundle
            .resolve(&model.name, &model.extension)
            .and_then(|path| {
                loader
                    .load(&path)
                    .map_err(|e| ConfigError::ModelLoad(e.to_string()))
            });

        match engine {
            Ok(engine) => {
                let _ = logger.info(&format!("Model {} ready", model.name));
                Self {
                    engine: Engine::Loaded(engine),
                    logger,
                }
            }
            Err(e) => {
                let _ = logger.error(&format!("Model {} unavailable: {}", model.name, e));
                Self {
                    engine: Engine::Unavailable(e),
                    logger,
                }
            }
        }
    }

    pub fn from_engine(
        engine: Arc<dyn ImageClassifier + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            engine: Engine::Loaded(engine),
            logger: logger.with_namespace("inference"),
        }
    }

    pub fn load_error(&self) -> Option<&ConfigError> {
        match &self.engine {
            Engine::Loaded(_) => None,
            Engine::Unavailable(e) => Some(e),
        }
    }

    pub fn is_available(&self) -> bool {
        self.load_error().is_none()
    }

    pub fn classify(&self, image: &CapturedImage) -> Result<ClassificationResult, InferenceError> {
        let engine = match &self.engine {
            Engine::Loaded(engine) => engine,
            Engine::Unavailable(_) => return Err(InferenceError::ModelUnavailable),
        };

        let raw = engine.classify(&image.bytes).map_err(|e| {
            let _ = self
                .logger
                .error(&format!("Photo #{} failed: {}", image.request_id, e));
            InferenceError::Engine(e.to_string())
        })?;

        let result = ClassificationResult::rank(raw)?;
        let _ = self.logger.info(&format!(
            "Photo #{} classified into {} label(s)",
            image.request_id,
            result.len()
        ));
        Ok(result)
    }
}
