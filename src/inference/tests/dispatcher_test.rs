use crate::config::ModelConfig;
use crate::device_camera::interface::StillEncoding;
use crate::error::{ConfigError, InferenceError};
use crate::image_classifier::impl_fake::ModelLoaderFake;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::inference::dispatcher::InferenceDispatcher;
use crate::library::logger::impl_fake::LoggerFake;
use crate::still_capture::controller::CapturedImage;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct ImageClassifierScripted {
    output: Result<Vec<Classification>, String>,
    calls: AtomicUsize,
}

impl ImageClassifierScripted {
    fn new(output: Result<Vec<Classification>, String>) -> Arc<Self> {
        Arc::new(Self {
            output,
            calls: AtomicUsize::new(0),
        })
    }
}

impl ImageClassifier for ImageClassifierScripted {
    fn classify(
        &self,
        _image: &[u8],
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.clone().map_err(Into::into)
    }
}

fn c(label: &str, confidence: f32) -> Classification {
    Classification {
        label: label.to_string(),
        confidence,
    }
}

fn image() -> CapturedImage {
    CapturedImage {
        request_id: 7,
        encoding: StillEncoding::Jpeg,
        width: 2,
        height: 2,
        bytes: Arc::from(vec![0xff, 0xd8, 0xff, 0xd9]),
    }
}

fn shipped_model() -> ModelConfig {
    ModelConfig {
        bundle_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources")),
        ..ModelConfig::default()
    }
}

#[test]
fn test_classify_ranks_engine_output() {
    let engine = ImageClassifierScripted::new(Ok(vec![c("a", 0.2), c("b", 0.9), c("c", 0.5)]));
    let dispatcher = InferenceDispatcher::from_engine(engine.clone(), Arc::new(LoggerFake::new()));

    let result = dispatcher.classify(&image()).unwrap();

    let labels: Vec<&str> = result.entries().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["b", "c", "a"]);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_engine_output_is_no_result() {
    let engine = ImageClassifierScripted::new(Ok(vec![]));
    let dispatcher = InferenceDispatcher::from_engine(engine, Arc::new(LoggerFake::new()));

    assert_eq!(dispatcher.classify(&image()), Err(InferenceError::NoResult));
}

#[test]
fn test_engine_failure_is_reported_and_logged() {
    let logger = LoggerFake::new();
    let engine = ImageClassifierScripted::new(Err("tensor shape mismatch".to_string()));
    let dispatcher = InferenceDispatcher::from_engine(engine, Arc::new(logger.clone()));

    assert_eq!(
        dispatcher.classify(&image()),
        Err(InferenceError::Engine("tensor shape mismatch".to_string()))
    );
    assert_eq!(logger.errors().len(), 1);
}

#[test]
fn test_loads_shipped_model() {
    let logger = Arc::new(LoggerFake::new());
    let dispatcher =
        InferenceDispatcher::load(&shipped_model(), &ModelLoaderFake::new(logger.clone()), logger);

    assert!(dispatcher.is_available());
    let result = dispatcher.classify(&image()).unwrap();
    assert_eq!(result.len(), 11);
}

#[test]
fn test_missing_model_is_unavailable_for_every_request() {
    let logger = LoggerFake::new();
    let model = ModelConfig {
        bundle_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/no-such-bundle")),
        ..ModelConfig::default()
    };

    let dispatcher = InferenceDispatcher::load(
        &model,
        &ModelLoaderFake::new(Arc::new(logger.clone())),
        Arc::new(logger.clone()),
    );

    assert!(matches!(
        dispatcher.load_error(),
        Some(ConfigError::ModelResourceMissing(_))
    ));
    assert_eq!(logger.errors().len(), 1);
    for _ in 0..3 {
        assert_eq!(
            dispatcher.classify(&image()),
            Err(InferenceError::ModelUnavailable)
        );
    }
}
