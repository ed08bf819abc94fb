use crate::capture_session::session::CaptureSession;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::DeviceInput;
use crate::inference::dispatcher::InferenceDispatcher;
use crate::library::logger::interface::Logger;
use crate::preview::sink::PreviewSink;
use crate::screen::core::{init, transition, ClassifierStatus, Effect, Model, Msg};
use crate::screen::render::Render;
use crate::screen::run_effect::RunEffect;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, PoisonError};

/// The UI-owning event loop. Only this loop mutates the model; everything
/// else reports back to it as a `Msg`.
pub struct Screen {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    classifier: ClassifierStatus,
    msg_receiver: Receiver<Msg>,
    run_effect: RunEffect,
    render: Render,
}

impl Screen {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        inference: Option<Arc<InferenceDispatcher>>,
    ) -> std::io::Result<Self> {
        let (msg_sender, msg_receiver) = channel();

        let classifier = match inference.as_deref() {
            None => ClassifierStatus::Disabled,
            Some(inference) => match inference.load_error() {
                None => ClassifierStatus::Ready,
                Some(e) => ClassifierStatus::Unavailable(e.clone()),
            },
        };

        let session = Arc::new(CaptureSession::new(
            device_camera.clone(),
            config.session_preset,
            logger.clone(),
        ));

        let bounds = device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .bounds();
        let preview = Arc::new(PreviewSink::new(config.fit_mode, bounds, logger.clone()));

        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            device_camera,
            device_display.clone(),
            device_input,
            session,
            preview,
            inference,
            msg_sender,
        )?;

        Ok(Self {
            config,
            logger: logger.with_namespace("screen"),
            classifier,
            msg_receiver,
            run_effect,
            render: Render::new(device_display),
        })
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect.run_effect(effect);
        }
    }

    /// Runs until quit is requested and the session has wound down. Returns
    /// the final model.
    pub fn run(&self) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        let (mut model, effects) = init(&self.config, self.classifier.clone());
        self.render.render(&model)?;
        self.run_effects(effects);

        while !model.is_finished() {
            let msg = self.msg_receiver.recv()?;
            let _ = self.logger.info(&format!("msg: {:?}", msg));

            let (new_model, effects) = transition(&self.config, model, msg);
            model = new_model;
            let _ = self.logger.info(&format!(
                "status: {:?}, session: {:?}, effects: {:?}",
                model.presenter.status(),
                model.session,
                effects
            ));

            self.render.render(&model)?;
            self.run_effects(effects);
        }

        let _ = self.logger.info("Screen finished");
        Ok(model)
    }
}
