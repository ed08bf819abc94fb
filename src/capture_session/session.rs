use crate::device_camera::interface::{CameraDevice, CameraPosition, DeviceCamera, StillEncoding};
use crate::error::{ConfigError, SessionError};
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPreset {
    Low,
    #[default]
    Medium,
    High,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutput {
    Preview,
    StillPhoto { encoding: StillEncoding },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceSelector {
    #[default]
    DefaultBackVideo,
}

#[derive(Debug, Clone, PartialEq)]
struct Wiring {
    device: CameraDevice,
    outputs: Vec<SessionOutput>,
}

#[derive(Debug, Clone, PartialEq)]
enum Inner {
    Unconfigured,
    Configured(Wiring),
    Running(Wiring),
    Stopped(Wiring),
}

impl Inner {
    fn state(&self) -> SessionState {
        match self {
            Inner::Unconfigured => SessionState::Unconfigured,
            Inner::Configured(_) => SessionState::Configured,
            Inner::Running(_) => SessionState::Running,
            Inner::Stopped(_) => SessionState::Stopped,
        }
    }

    fn wiring(&self) -> Option<&Wiring> {
        match self {
            Inner::Unconfigured => None,
            Inner::Configured(wiring) | Inner::Running(wiring) | Inner::Stopped(wiring) => {
                Some(wiring)
            }
        }
    }
}

/// Coordinates one camera input with its outputs.
///
/// `start` and `stop` block on the hardware and must be called from a worker
/// context. The state lock is held across the hardware call, so concurrent
/// callers serialise and only the first one performs the transition.
pub struct CaptureSession {
    camera: Arc<dyn DeviceCamera + Send + Sync>,
    preset: SessionPreset,
    logger: Arc<dyn Logger + Send + Sync>,
    inner: Mutex<Inner>,
}

impl CaptureSession {
    pub fn new(
        camera: Arc<dyn DeviceCamera + Send + Sync>,
        preset: SessionPreset,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            camera,
            preset,
            logger: logger.with_namespace("session"),
            inner: Mutex::new(Inner::Unconfigured),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    pub fn device(&self) -> Option<CameraDevice> {
        self.lock().wiring().map(|wiring| wiring.device.clone())
    }

    pub fn outputs(&self) -> Vec<SessionOutput> {
        self.lock()
            .wiring()
            .map(|wiring| wiring.outputs.clone())
            .unwrap_or_default()
    }

    /// Selects the camera, opens it and attaches `outputs`.
    ///
    /// Every output is checked before anything is attached. On failure the
    /// session is left `Unconfigured`.
    pub fn configure(
        &self,
        selector: DeviceSelector,
        outputs: &[SessionOutput],
    ) -> Result<(), ConfigError> {
        let mut inner = self.lock();

        match inner.state() {
            state @ (SessionState::Running | SessionState::Stopped) => {
                return Err(ConfigError::Reconfigure(state));
            }
            SessionState::Unconfigured | SessionState::Configured => {}
        }

        match self.wire(selector, outputs) {
            Ok(wiring) => {
                let _ = self.logger.info(&format!(
                    "Configured {} with {} output(s)",
                    wiring.device.name,
                    wiring.outputs.len()
                ));
                *inner = Inner::Configured(wiring);
                Ok(())
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Configuration failed: {}", e));
                *inner = Inner::Unconfigured;
                Err(e)
            }
        }
    }

    fn wire(
        &self,
        selector: DeviceSelector,
        outputs: &[SessionOutput],
    ) -> Result<Wiring, ConfigError> {
        if outputs.is_empty() {
            return Err(ConfigError::NoOutputs);
        }

        let position = match selector {
            DeviceSelector::DefaultBackVideo => CameraPosition::Back,
        };

        let device = self
            .camera
            .default_device(position)
            .ok_or(ConfigError::NoDevice)?;

        if let Some(output) = outputs
            .iter()
            .find(|output| !self.camera.supports(self.preset, output))
        {
            return Err(ConfigError::IncompatibleOutput {
                output: *output,
                preset: self.preset,
            });
        }

        self.camera
            .open(&device)
            .map_err(|e| ConfigError::DeviceInput(e.to_string()))?;

        let mut attached: Vec<SessionOutput> = Vec::with_capacity(outputs.len());
        for output in outputs {
            if !attached.contains(output) {
                attached.push(*output);
            }
        }

        Ok(Wiring {
            device,
            outputs: attached,
        })
    }

    /// `Configured | Stopped -> Running`. Returns `Ok(false)` when already running.
    pub fn start(&self) -> Result<bool, SessionError> {
        let mut inner = self.lock();

        // The current state stays in place until the hardware has answered.
        let wiring = match &*inner {
            Inner::Running(_) => return Ok(false),
            Inner::Unconfigured => return Err(SessionError::NotConfigured),
            Inner::Configured(wiring) | Inner::Stopped(wiring) => wiring.clone(),
        };

        match self.camera.start() {
            Ok(()) => {
                *inner = Inner::Running(wiring);
                let _ = self.logger.info("Session running");
                Ok(true)
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Session failed to start: {}", e));
                Err(SessionError::Hardware(e.to_string()))
            }
        }
    }

    /// `Running -> Stopped`. Returns `Ok(false)` when there was nothing to stop.
    pub fn stop(&self) -> Result<bool, SessionError> {
        let mut inner = self.lock();

        let wiring = match &*inner {
            Inner::Running(wiring) => wiring.clone(),
            _ => return Ok(false),
        };

        match self.camera.stop() {
            Ok(()) => {
                *inner = Inner::Stopped(wiring);
                let _ = self.logger.info("Session stopped");
                Ok(true)
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Session failed to stop: {}", e));
                Err(SessionError::Hardware(e.to_string()))
            }
        }
    }
}
