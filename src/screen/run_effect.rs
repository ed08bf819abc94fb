use crate::capture_session::session::{CaptureSession, DeviceSelector, SessionOutput};
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::DeviceInput;
use crate::error::InferenceError;
use crate::inference::dispatcher::InferenceDispatcher;
use crate::library::logger::interface::Logger;
use crate::library::worker::Worker;
use crate::preview::sink::PreviewSink;
use crate::screen::core::{Effect, Msg};
use crate::still_capture::controller;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// Executes effects off the UI context and reports back through `msg_sender`.
///
/// Session configure/start/stop run on the `session` worker, capture and
/// inference on the `pipeline` worker. The preview loop gets its own thread
/// so that a stop request never queues behind it.
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    device_input: Arc<dyn DeviceInput + Send + Sync>,
    session: Arc<CaptureSession>,
    preview: Arc<PreviewSink>,
    inference: Option<Arc<InferenceDispatcher>>,
    session_worker: Worker,
    pipeline_worker: Worker,
    msg_sender: Sender<Msg>,
}

impl RunEffect {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        session: Arc<CaptureSession>,
        preview: Arc<PreviewSink>,
        inference: Option<Arc<InferenceDispatcher>>,
        msg_sender: Sender<Msg>,
    ) -> std::io::Result<Self> {
        Ok(Self {
            config,
            logger: logger.with_namespace("effect"),
            device_camera,
            device_display,
            device_input,
            session,
            preview,
            inference,
            session_worker: Worker::spawn("session")?,
            pipeline_worker: Worker::spawn("pipeline")?,
            msg_sender,
        })
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::SubscribeInput => {
                let events = self.device_input.events();
                let msg_sender = self.msg_sender.clone();
                let spawned = std::thread::Builder::new()
                    .name("input".to_string())
                    .spawn(move || {
                        for event in events {
                            if msg_sender.send(Msg::Input(event)).is_err() {
                                break;
                            }
                        }
                    });
                if let Err(e) = spawned {
                    let _ = self.logger.error(&format!("Input thread failed: {}", e));
                }
            }
            Effect::ConfigureSession => {
                let outputs = [
                    SessionOutput::Preview,
                    SessionOutput::StillPhoto {
                        encoding: self.config.still_encoding,
                    },
                ];
                let session = self.session.clone();
                self.on_session_worker(move || {
                    Msg::ConfigureDone(session.configure(DeviceSelector::DefaultBackVideo, &outputs))
                });
            }
            Effect::StartSession => {
                let session = self.session.clone();
                self.on_session_worker(move || Msg::StartDone(session.start()));
            }
            Effect::StopSession => {
                self.preview.detach();
                let session = self.session.clone();
                self.on_session_worker(move || Msg::StopDone(session.stop()));
            }
            Effect::AttachPreview => self.attach_preview(),
            Effect::CaptureStill(request) => {
                let camera = self.device_camera.clone();
                self.on_pipeline_worker(move || Msg::CaptureDone {
                    request_id: request.id,
                    result: controller::execute(camera.as_ref(), request),
                });
            }
            Effect::Classify { request_id, image } => {
                let inference = self.inference.clone();
                self.on_pipeline_worker(move || Msg::ClassifyDone {
                    request_id,
                    result: match inference {
                        Some(inference) => inference.classify(&image),
                        None => Err(InferenceError::ModelUnavailable),
                    },
                });
            }
            Effect::LogError(message) => {
                let _ = self.logger.error(&message);
            }
        }
    }

    fn attach_preview(&self) {
        let generation = self.preview.attach();
        let preview = self.preview.clone();
        let session = self.session.clone();
        let camera = self.device_camera.clone();
        let display = self.device_display.clone();
        let frame_interval = self.config.preview_frame_interval;
        let msg_sender = self.msg_sender.clone();

        let spawned = std::thread::Builder::new()
            .name("preview".to_string())
            .spawn(move || {
                let exit = preview.run(
                    generation,
                    &session,
                    camera.as_ref(),
                    display.as_ref(),
                    frame_interval,
                );
                let _ = msg_sender.send(Msg::PreviewEnded(exit));
            });
        if let Err(e) = spawned {
            let _ = self.logger.error(&format!("Preview thread failed: {}", e));
        }
    }

    fn on_session_worker(&self, job: impl FnOnce() -> Msg + Send + 'static) {
        self.dispatch(&self.session_worker, job);
    }

    fn on_pipeline_worker(&self, job: impl FnOnce() -> Msg + Send + 'static) {
        self.dispatch(&self.pipeline_worker, job);
    }

    fn dispatch(&self, worker: &Worker, job: impl FnOnce() -> Msg + Send + 'static) {
        let msg_sender = self.msg_sender.clone();
        let accepted = worker.execute(move || {
            let _ = msg_sender.send(job());
        });
        if !accepted {
            let _ = self
                .logger
                .error(&format!("Worker {} is gone, effect dropped", worker.name()));
        }
    }
}
