use crate::capture_session::session::{SessionOutput, SessionPreset, SessionState};
use std::path::PathBuf;
use thiserror::Error;

/// Setup-time failures. They disable the capture capability of the screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no camera device available")]
    NoDevice,
    #[error("unable to open camera input: {0}")]
    DeviceInput(String),
    #[error("output {output:?} is incompatible with session preset {preset:?}")]
    IncompatibleOutput {
        output: SessionOutput,
        preset: SessionPreset,
    },
    #[error("session declares no outputs")]
    NoOutputs,
    #[error("cannot reconfigure a {0:?} session")]
    Reconfigure(SessionState),
    #[error("model resource not found: {0}")]
    ModelResourceMissing(PathBuf),
    #[error("model failed to load: {0}")]
    ModelLoad(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is not configured")]
    NotConfigured,
    #[error("camera hardware error: {0}")]
    Hardware(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("a capture is already in progress")]
    Busy,
    #[error("capture failed: {0}")]
    HardwareFailure(String),
    #[error("capture cancelled")]
    Cancelled,
    #[error("capture session is not running")]
    SessionNotRunning,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("classification model is unavailable")]
    ModelUnavailable,
    #[error("classifier returned no results")]
    NoResult,
    #[error("classification cancelled")]
    Cancelled,
    #[error("classifier failed: {0}")]
    Engine(String),
}
