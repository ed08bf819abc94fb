use crate::capture_session::session::CaptureSession;
use crate::device_camera::interface::{DeviceCamera, VideoFrame};
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::preview::fit::{fit_rect, FitMode, Rect, Size};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewExit {
    SessionStopped,
    Detached,
    Display(String),
}

/// Renders the live stream. Holds at most one undrawn frame: a newer frame
/// replaces it and the older one is counted as dropped.
pub struct PreviewSink {
    fit_mode: FitMode,
    bounds: Mutex<Size>,
    slot: Mutex<Option<VideoFrame>>,
    generation: AtomicU64,
    dropped: AtomicU64,
    drawn: AtomicU64,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PreviewSink {
    pub fn new(fit_mode: FitMode, bounds: Size, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            fit_mode,
            bounds: Mutex::new(bounds),
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            drawn: AtomicU64::new(0),
            logger: logger.with_namespace("preview"),
        }
    }

    pub fn bounds(&self) -> Size {
        *self.bounds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true when the bounds actually changed.
    pub fn resize(&self, bounds: Size) -> bool {
        let mut current = self.bounds.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == bounds {
            return false;
        }
        *current = bounds;
        true
    }

    pub fn layout(&self, frame: Size) -> Rect {
        fit_rect(frame, self.bounds(), self.fit_mode)
    }

    pub fn offer(&self, frame: VideoFrame) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.replace(frame).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn take(&self) -> Option<VideoFrame> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn drawn_frames(&self) -> u64 {
        self.drawn.load(Ordering::Relaxed)
    }

    /// Starts a new attachment. Any loop running for an older attachment ends.
    pub fn attach(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.take();
    }

    pub fn is_attached(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Draws the pending frame, if any, re-fitting to the surface's current bounds.
    pub fn draw_latest(
        &self,
        display: &Mutex<dyn DeviceDisplay + Send + Sync>,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let Some(frame) = self.take() else {
            return Ok(false);
        };

        let mut display = display.lock().unwrap_or_else(PoisonError::into_inner);
        if self.resize(display.bounds()) {
            let _ = self.logger.info(&format!("Re-fit to {:?}", self.bounds()));
        }
        let rect = self.layout(frame.size());
        display.show_preview(&frame, rect)?;
        self.drawn.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    /// Continuous render loop for one attachment. Runs until the session
    /// leaves `Running` or the sink is detached.
    pub fn run(
        &self,
        generation: u64,
        session: &CaptureSession,
        camera: &dyn DeviceCamera,
        display: &Mutex<dyn DeviceDisplay + Send + Sync>,
        frame_interval: Duration,
    ) -> PreviewExit {
        let _ = self.logger.info("Preview attached");

        let exit = loop {
            if !self.is_attached(generation) {
                break PreviewExit::Detached;
            }
            if !session.is_running() {
                break PreviewExit::SessionStopped;
            }

            match camera.next_frame() {
                Ok(frame) => self.offer(frame),
                Err(e) => {
                    let _ = self.logger.info(&format!("No frame: {}", e));
                }
            }

            if let Err(e) = self.draw_latest(display) {
                break PreviewExit::Display(e.to_string());
            }

            std::thread::sleep(frame_interval);
        };

        let _ = self.logger.info(&format!(
            "Preview ended ({:?}), drawn {}, dropped {}",
            exit,
            self.drawn_frames(),
            self.dropped_frames()
        ));

        exit
    }
}
