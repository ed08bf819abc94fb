use crate::config::Config;
use crate::device_camera::interface::StillEncoding;
use crate::device_input::interface::InputEvent;
use crate::error::{CaptureError, ConfigError, InferenceError, SessionError};
use crate::image_classifier::interface::Classification;
use crate::inference::ranking::ClassificationResult;
use crate::presenter::state::Status;
use crate::screen::core::{
    init, transition, ClassifierStatus, Effect, InferencePhase, Model, Msg, SessionPhase,
};
use crate::still_capture::controller::{CaptureRequest, CapturedImage};
use std::path::PathBuf;
use std::sync::Arc;

fn image(request_id: u64) -> CapturedImage {
    CapturedImage {
        request_id,
        encoding: StillEncoding::Jpeg,
        width: 4,
        height: 3,
        bytes: Arc::from(vec![0xff, 0xd8, request_id as u8, 0xff, 0xd9]),
    }
}

fn ranked() -> ClassificationResult {
    ClassificationResult::rank(vec![
        Classification {
            label: "dog".to_string(),
            confidence: 0.75,
        },
        Classification {
            label: "cat".to_string(),
            confidence: 0.25,
        },
    ])
    .unwrap()
}

fn run(config: &Config, model: Model, msgs: Vec<Msg>) -> (Model, Vec<Effect>) {
    msgs.into_iter()
        .fold((model, vec![]), |(model, _), msg| transition(config, model, msg))
}

fn running(config: &Config, classifier: ClassifierStatus) -> Model {
    let (model, _) = init(config, classifier);
    let (model, _) = run(
        config,
        model,
        vec![Msg::ConfigureDone(Ok(())), Msg::StartDone(Ok(true))],
    );
    model
}

fn capturing(config: &Config, classifier: ClassifierStatus) -> Model {
    let (model, _) = transition(
        config,
        running(config, classifier),
        Msg::Input(InputEvent::TakePhoto),
    );
    model
}

#[test]
fn test_init() {
    let config = Config::default();

    let (model, effects) = init(&config, ClassifierStatus::Ready);

    assert!(model.visible);
    assert_eq!(model.session, SessionPhase::Configuring);
    assert_eq!(model.presenter.status(), &Status::Starting);
    assert_eq!(model.presenter.notice(), None);
    assert_eq!(effects, vec![Effect::SubscribeInput, Effect::ConfigureSession]);
}

#[test]
fn test_init_surfaces_model_load_failure_once() {
    let config = Config::default();
    let error = ConfigError::ModelResourceMissing(PathBuf::from("resources/Missing.labels"));

    let (model, effects) = init(&config, ClassifierStatus::Unavailable(error));

    assert_eq!(
        model.presenter.notice(),
        Some("Classification unavailable: model resource not found: resources/Missing.labels")
    );
    assert_eq!(effects, vec![Effect::SubscribeInput, Effect::ConfigureSession]);
}

#[test]
fn test_session_comes_up_and_attaches_preview() {
    let config = Config::default();
    let (model, _) = init(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(&config, model, Msg::ConfigureDone(Ok(())));
    assert_eq!(model.session, SessionPhase::Starting);
    assert_eq!(effects, vec![Effect::StartSession]);

    let (model, effects) = transition(&config, model, Msg::StartDone(Ok(true)));
    assert_eq!(model.session, SessionPhase::Running);
    assert_eq!(model.presenter.status(), &Status::Live);
    assert!(model.presenter.capture_enabled());
    assert_eq!(effects, vec![Effect::AttachPreview]);
}

#[test]
fn test_configure_failure_disables_capture() {
    let config = Config::default();
    let (model, _) = init(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(&config, model, Msg::ConfigureDone(Err(ConfigError::NoDevice)));

    assert_eq!(model.session, SessionPhase::Failed(ConfigError::NoDevice));
    assert!(!model.presenter.capture_enabled());
    assert_eq!(
        effects,
        vec![Effect::LogError(
            "Session setup failed: no camera device available".to_string()
        )]
    );

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::TakePhoto));
    assert!(!model.capture.is_pending());
    assert!(matches!(effects.as_slice(), [Effect::LogError(_)]));
}

#[test]
fn test_start_failure_keeps_session_restartable() {
    let config = Config::default();
    let (model, _) = init(&config, ClassifierStatus::Ready);

    let (model, _) = run(
        &config,
        model,
        vec![
            Msg::ConfigureDone(Ok(())),
            Msg::StartDone(Err(SessionError::Hardware("sensor timeout".to_string()))),
        ],
    );
    assert_eq!(model.session, SessionPhase::Configured);
    assert_eq!(
        model.presenter.error_text(),
        Some("camera hardware error: sensor timeout".to_string())
    );

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Appear));
    assert_eq!(model.session, SessionPhase::Starting);
    assert_eq!(effects, vec![Effect::StartSession]);
}

#[test]
fn test_take_photo_before_session_runs() {
    let config = Config::default();
    let (model, _) = init(&config, ClassifierStatus::Ready);

    let (model, _) = transition(&config, model, Msg::Input(InputEvent::TakePhoto));

    assert!(!model.capture.is_pending());
    assert_eq!(
        model.presenter.error_text(),
        Some(CaptureError::SessionNotRunning.to_string())
    );
}

#[test]
fn test_take_photo_issues_capture() {
    let config = Config::default();

    let (model, effects) = transition(
        &config,
        running(&config, ClassifierStatus::Ready),
        Msg::Input(InputEvent::TakePhoto),
    );

    assert_eq!(model.presenter.status(), &Status::Capturing);
    assert!(!model.presenter.capture_enabled());
    assert_eq!(
        effects,
        vec![Effect::CaptureStill(CaptureRequest {
            id: 1,
            encoding: StillEncoding::Jpeg,
        })]
    );
}

#[test]
fn test_second_tap_while_pending_is_busy_and_first_completes() {
    let config = Config::default();
    let model = capturing(&config, ClassifierStatus::Disabled);

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::TakePhoto));
    assert_eq!(
        effects,
        vec![Effect::LogError(
            "Capture failed: a capture is already in progress".to_string()
        )]
    );
    assert!(model.capture.is_pending());

    let (model, effects) = transition(
        &config,
        model,
        Msg::CaptureDone {
            request_id: 1,
            result: Ok(image(1)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(model.presenter.image(), Some(&image(1)));
    assert_eq!(model.presenter.error_text(), None);
    assert_eq!(model.presenter.status(), &Status::Live);
}

#[test]
fn test_capture_done_dispatches_classification() {
    let config = Config::default();
    let model = capturing(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(
        &config,
        model,
        Msg::CaptureDone {
            request_id: 1,
            result: Ok(image(1)),
        },
    );
    assert_eq!(model.inference, InferencePhase::Pending { request_id: 1 });
    assert_eq!(model.presenter.status(), &Status::Classifying);
    assert_eq!(
        effects,
        vec![Effect::Classify {
            request_id: 1,
            image: image(1),
        }]
    );

    let (model, effects) = transition(
        &config,
        model,
        Msg::ClassifyDone {
            request_id: 1,
            result: Ok(ranked()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(model.inference, InferencePhase::Idle);
    assert_eq!(model.presenter.label(), Some("dog - 0.75 / cat - 0.25"));
    assert_eq!(model.presenter.status(), &Status::Live);
}

#[test]
fn test_hardware_failure_is_reported_and_capture_stays_enabled() {
    let config = Config::default();
    let model = capturing(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(
        &config,
        model,
        Msg::CaptureDone {
            request_id: 1,
            result: Err(CaptureError::HardwareFailure("shutter jammed".to_string())),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::LogError(
            "Capture failed: capture failed: shutter jammed".to_string()
        )]
    );
    assert_eq!(model.inference, InferencePhase::Idle);
    assert!(model.presenter.capture_enabled());
}

#[test]
fn test_unavailable_model_never_dispatches_classification() {
    let config = Config::default();
    let error = ConfigError::ModelLoad("corrupt".to_string());
    let model = capturing(&config, ClassifierStatus::Unavailable(error));

    let (model, effects) = transition(
        &config,
        model,
        Msg::CaptureDone {
            request_id: 1,
            result: Ok(image(1)),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(model.inference, InferencePhase::Idle);
    assert_eq!(model.presenter.label(), None);
    assert_eq!(
        model.presenter.error_text(),
        Some(InferenceError::ModelUnavailable.to_string())
    );
}

#[test]
fn test_stop_without_pending_work() {
    let config = Config::default();
    let model = running(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Disappear));
    assert_eq!(model.session, SessionPhase::Stopping);
    assert_eq!(effects, vec![Effect::StopSession]);

    let (model, effects) = transition(&config, model, Msg::StopDone(Ok(true)));
    assert_eq!(model.session, SessionPhase::Stopped);
    assert_eq!(model.presenter.status(), &Status::Stopped);
    assert_eq!(model.presenter.error_text(), None);
    assert!(effects.is_empty());
}

#[test]
fn test_stop_cancels_pending_capture_and_discards_late_result() {
    let config = Config::default();
    let model = capturing(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Disappear));
    assert_eq!(effects, vec![Effect::StopSession]);
    assert!(!model.capture.is_pending());
    assert_eq!(
        model.presenter.error_text(),
        Some(CaptureError::Cancelled.to_string())
    );

    let (model, effects) = transition(
        &config,
        model,
        Msg::CaptureDone {
            request_id: 1,
            result: Ok(image(1)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(model.presenter.image(), None);
}

#[test]
fn test_stop_cancels_pending_inference() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        capturing(&config, ClassifierStatus::Ready),
        vec![
            Msg::CaptureDone {
                request_id: 1,
                result: Ok(image(1)),
            },
            Msg::Input(InputEvent::Disappear),
        ],
    );
    assert_eq!(model.inference, InferencePhase::Idle);
    assert_eq!(
        model.presenter.error_text(),
        Some(InferenceError::Cancelled.to_string())
    );

    let (model, _) = transition(
        &config,
        model,
        Msg::ClassifyDone {
            request_id: 1,
            result: Ok(ranked()),
        },
    );
    assert_eq!(model.presenter.label(), None);
}

#[test]
fn test_newer_photo_supersedes_pending_classification() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        capturing(&config, ClassifierStatus::Ready),
        vec![
            Msg::CaptureDone {
                request_id: 1,
                result: Ok(image(1)),
            },
            Msg::Input(InputEvent::TakePhoto),
            Msg::CaptureDone {
                request_id: 2,
                result: Ok(image(2)),
            },
        ],
    );
    assert_eq!(model.inference, InferencePhase::Pending { request_id: 2 });

    let (model, _) = transition(
        &config,
        model,
        Msg::ClassifyDone {
            request_id: 1,
            result: Ok(ranked()),
        },
    );
    assert_eq!(model.inference, InferencePhase::Pending { request_id: 2 });
    assert_eq!(model.presenter.label(), None);
}

#[test]
fn test_reappear_restarts_stopped_session() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        running(&config, ClassifierStatus::Ready),
        vec![Msg::Input(InputEvent::Disappear), Msg::StopDone(Ok(true))],
    );

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Appear));

    assert_eq!(model.session, SessionPhase::Starting);
    assert_eq!(effects, vec![Effect::StartSession]);
}

#[test]
fn test_hidden_while_starting_stops_once_started() {
    let config = Config::default();
    let (model, _) = init(&config, ClassifierStatus::Ready);
    let (model, _) = run(
        &config,
        model,
        vec![Msg::ConfigureDone(Ok(())), Msg::Input(InputEvent::Disappear)],
    );
    assert_eq!(model.session, SessionPhase::Starting);

    let (model, effects) = transition(&config, model, Msg::StartDone(Ok(true)));

    assert_eq!(model.session, SessionPhase::Stopping);
    assert_eq!(effects, vec![Effect::StopSession]);
}

#[test]
fn test_quit_finishes_after_session_stops() {
    let config = Config::default();
    let model = running(&config, ClassifierStatus::Ready);

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Quit));
    assert_eq!(effects, vec![Effect::StopSession]);
    assert!(!model.is_finished());

    let (model, _) = transition(&config, model, Msg::StopDone(Ok(true)));
    assert!(model.is_finished());
}

#[test]
fn test_failed_stop_reattaches_preview_when_visible() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        running(&config, ClassifierStatus::Ready),
        vec![Msg::Input(InputEvent::Disappear), Msg::Input(InputEvent::Appear)],
    );
    assert_eq!(model.session, SessionPhase::Stopping);

    let (model, effects) = transition(
        &config,
        model,
        Msg::StopDone(Err(SessionError::Hardware("stuck".to_string()))),
    );

    assert_eq!(model.session, SessionPhase::Running);
    assert_eq!(model.presenter.status(), &Status::Live);
    assert_eq!(
        effects,
        vec![
            Effect::LogError("Session stop failed: camera hardware error: stuck".to_string()),
            Effect::AttachPreview,
        ]
    );
}

#[test]
fn test_appear_after_failed_stop_reattaches_preview() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        running(&config, ClassifierStatus::Ready),
        vec![Msg::Input(InputEvent::Disappear)],
    );

    let (model, effects) = transition(
        &config,
        model,
        Msg::StopDone(Err(SessionError::Hardware("stuck".to_string()))),
    );
    assert_eq!(model.session, SessionPhase::Running);
    assert!(!effects.contains(&Effect::AttachPreview));

    let (model, effects) = transition(&config, model, Msg::Input(InputEvent::Appear));

    assert_eq!(model.session, SessionPhase::Running);
    assert_eq!(effects, vec![Effect::AttachPreview]);
}

#[test]
fn test_failed_stop_while_quitting_still_finishes() {
    let config = Config::default();
    let (model, _) = run(
        &config,
        running(&config, ClassifierStatus::Ready),
        vec![
            Msg::Input(InputEvent::Quit),
            Msg::StopDone(Err(SessionError::Hardware("stuck".to_string()))),
        ],
    );

    assert!(model.is_finished());
}
