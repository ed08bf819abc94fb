use crate::config::Config;
use crate::device_input::interface::InputEvent;
use crate::error::{CaptureError, ConfigError, InferenceError, SessionError};
use crate::inference::ranking::ClassificationResult;
use crate::preview::sink::PreviewExit;
use crate::presenter::state::{Presenter, Status};
use crate::still_capture::controller::{CaptureRequest, CapturedImage, StillCaptureController};

/// The screen's view of the capture session. Transitions to the real session
/// happen on the session worker; this tracks what has been requested.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Configuring,
    Configured,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferencePhase {
    Idle,
    Pending { request_id: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierStatus {
    /// Capture-only screen.
    Disabled,
    Ready,
    Unavailable(ConfigError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub visible: bool,
    pub exiting: bool,
    pub session: SessionPhase,
    pub capture: StillCaptureController,
    pub inference: InferencePhase,
    pub classifier: ClassifierStatus,
    pub presenter: Presenter,
}

impl Model {
    /// True once quit was requested and the camera is no longer in use.
    pub fn is_finished(&self) -> bool {
        self.exiting
            && matches!(
                self.session,
                SessionPhase::Configured
                    | SessionPhase::Stopped
                    | SessionPhase::Failed(_)
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Input(InputEvent),
    ConfigureDone(Result<(), ConfigError>),
    StartDone(Result<bool, SessionError>),
    StopDone(Result<bool, SessionError>),
    PreviewEnded(PreviewExit),
    CaptureDone {
        request_id: u64,
        result: Result<CapturedImage, CaptureError>,
    },
    ClassifyDone {
        request_id: u64,
        result: Result<ClassificationResult, InferenceError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeInput,
    ConfigureSession,
    StartSession,
    StopSession,
    AttachPreview,
    CaptureStill(CaptureRequest),
    Classify {
        request_id: u64,
        image: CapturedImage,
    },
    LogError(String),
}

pub fn init(config: &Config, classifier: ClassifierStatus) -> (Model, Vec<Effect>) {
    let mut presenter = Presenter::new(config.top_label_count);
    if let ClassifierStatus::Unavailable(e) = &classifier {
        presenter.set_notice(format!("Classification unavailable: {}", e));
    }

    let mut model = Model {
        visible: true,
        exiting: false,
        session: SessionPhase::Configuring,
        capture: StillCaptureController::new(),
        inference: InferencePhase::Idle,
        classifier,
        presenter,
    };
    settle_status(&mut model);

    (model, vec![Effect::SubscribeInput, Effect::ConfigureSession])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    let (mut model, effects) = step(config, model, msg);
    settle_status(&mut model);
    (model, effects)
}

fn step(config: &Config, mut model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        // Lifecycle
        Msg::Input(InputEvent::Appear) => {
            model.visible = true;
            if model.exiting {
                return (model, vec![]);
            }
            match model.session {
                SessionPhase::Configured | SessionPhase::Stopped => {
                    model.session = SessionPhase::Starting;
                    (model, vec![Effect::StartSession])
                }
                // A failed stop may have left the session running without a
                // preview loop. `attach` retires any loop that is still alive.
                SessionPhase::Running => (model, vec![Effect::AttachPreview]),
                _ => (model, vec![]),
            }
        }
        Msg::Input(InputEvent::Disappear) => {
            model.visible = false;
            let effects = stop(&mut model);
            (model, effects)
        }
        Msg::Input(InputEvent::Quit) => {
            model.exiting = true;
            let effects = stop(&mut model);
            (model, effects)
        }

        Msg::ConfigureDone(Ok(())) => {
            if model.visible && !model.exiting {
                model.session = SessionPhase::Starting;
                (model, vec![Effect::StartSession])
            } else {
                model.session = SessionPhase::Configured;
                (model, vec![])
            }
        }
        Msg::ConfigureDone(Err(e)) => {
            model.presenter.disable(&e);
            let message = format!("Session setup failed: {}", e);
            model.session = SessionPhase::Failed(e);
            (model, vec![Effect::LogError(message)])
        }

        Msg::StartDone(Ok(_)) => {
            model.session = SessionPhase::Running;
            model.presenter.clear_session_error();
            if !model.visible || model.exiting {
                model.session = SessionPhase::Stopping;
                (model, vec![Effect::StopSession])
            } else {
                (model, vec![Effect::AttachPreview])
            }
        }
        Msg::StartDone(Err(e)) => {
            model.presenter.on_session_error(&e);
            model.session = SessionPhase::Configured;
            (
                model,
                vec![Effect::LogError(format!("Session start failed: {}", e))],
            )
        }

        Msg::StopDone(Ok(_)) => {
            model.session = SessionPhase::Stopped;
            if model.visible && !model.exiting {
                // Re-appeared while stopping.
                model.session = SessionPhase::Starting;
                (model, vec![Effect::StartSession])
            } else {
                (model, vec![])
            }
        }
        Msg::StopDone(Err(e)) => {
            model.presenter.on_session_error(&e);
            let mut effects = vec![Effect::LogError(format!("Session stop failed: {}", e))];
            // The camera refused to stop. Still let the screen exit.
            if model.exiting {
                model.session = SessionPhase::Stopped;
            } else {
                model.session = SessionPhase::Running;
                // The preview was detached ahead of the stop.
                if model.visible {
                    effects.push(Effect::AttachPreview);
                }
            }
            (model, effects)
        }

        Msg::PreviewEnded(PreviewExit::Display(reason)) => (
            model,
            vec![Effect::LogError(format!("Preview display failed: {}", reason))],
        ),
        Msg::PreviewEnded(_) => (model, vec![]),

        // Still capture
        Msg::Input(InputEvent::TakePhoto) => {
            if model.session != SessionPhase::Running {
                return reject_capture(model, CaptureError::SessionNotRunning);
            }
            match model.capture.begin(config.still_encoding) {
                Ok(request) => (model, vec![Effect::CaptureStill(request)]),
                Err(e) => reject_capture(model, e),
            }
        }
        Msg::CaptureDone { request_id, result } => {
            match model.capture.complete(request_id, result) {
                None => (model, vec![]),
                Some(Ok(image)) => {
                    model.presenter.on_capture(image.clone());
                    classify(model, image)
                }
                Some(Err(e)) => reject_capture(model, e),
            }
        }

        // Inference
        Msg::ClassifyDone { request_id, result } => {
            if model.inference != (InferencePhase::Pending { request_id }) {
                return (model, vec![]);
            }
            model.inference = InferencePhase::Idle;
            model.presenter.on_classification(&result);
            match result {
                Ok(_) => (model, vec![]),
                Err(e) => (
                    model,
                    vec![Effect::LogError(format!(
                        "Photo #{} not classified: {}",
                        request_id, e
                    ))],
                ),
            }
        }
    }
}

fn reject_capture(mut model: Model, error: CaptureError) -> (Model, Vec<Effect>) {
    let message = format!("Capture failed: {}", error);
    model.presenter.on_capture_failed(error);
    (model, vec![Effect::LogError(message)])
}

fn classify(mut model: Model, image: CapturedImage) -> (Model, Vec<Effect>) {
    match &model.classifier {
        ClassifierStatus::Disabled => (model, vec![]),
        ClassifierStatus::Unavailable(_) => {
            model
                .presenter
                .on_classification(&Err(InferenceError::ModelUnavailable));
            (model, vec![])
        }
        ClassifierStatus::Ready => {
            let request_id = image.request_id;
            model.inference = InferencePhase::Pending { request_id };
            (model, vec![Effect::Classify { request_id, image }])
        }
    }
}

/// Cancels in-flight work and stops a session that is, or is about to be, running.
fn stop(model: &mut Model) -> Vec<Effect> {
    if model.capture.cancel().is_some() {
        model.presenter.on_capture_failed(CaptureError::Cancelled);
    }
    if let InferencePhase::Pending { .. } = model.inference {
        model.inference = InferencePhase::Idle;
        model
            .presenter
            .on_classification(&Err(InferenceError::Cancelled));
    }

    match model.session {
        SessionPhase::Running => {
            model.session = SessionPhase::Stopping;
            vec![Effect::StopSession]
        }
        // Starting and Configuring finish first and see `visible`/`exiting`.
        _ => vec![],
    }
}

fn settle_status(model: &mut Model) {
    let status = match &model.session {
        SessionPhase::Configured => Status::Idle,
        SessionPhase::Configuring | SessionPhase::Starting => Status::Starting,
        SessionPhase::Running if model.capture.is_pending() => Status::Capturing,
        SessionPhase::Running if model.inference != InferencePhase::Idle => Status::Classifying,
        SessionPhase::Running => Status::Live,
        SessionPhase::Stopping | SessionPhase::Stopped => Status::Stopped,
        SessionPhase::Failed(_) => return,
    };
    model.presenter.set_status(status);
}
