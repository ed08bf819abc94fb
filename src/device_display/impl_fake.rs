use crate::device_camera::interface::VideoFrame;
use crate::device_display::interface::DeviceDisplay;
use crate::preview::fit::{Rect, Size};
use crate::still_capture::controller::CapturedImage;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySnapshot {
    pub bounds: Size,
    pub preview_frames: u64,
    pub preview_rect: Option<Rect>,
    pub capture: Option<CapturedImage>,
    pub label: Option<String>,
    pub status: String,
    pub status_history: Vec<String>,
    pub capture_enabled: bool,
}

/// Records what was shown. Clones share the same record, so a test can keep
/// one handle while the screen owns another.
#[derive(Debug, Clone, Default)]
pub struct DeviceDisplayFake {
    state: Arc<Mutex<DisplaySnapshot>>,
}

impl DeviceDisplayFake {
    pub fn new(bounds: Size) -> Self {
        Self {
            state: Arc::new(Mutex::new(DisplaySnapshot {
                bounds,
                ..DisplaySnapshot::default()
            })),
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_bounds(&self, bounds: Size) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .bounds = bounds;
    }

    fn update(&self, f: impl FnOnce(&mut DisplaySnapshot)) {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn bounds(&self) -> Size {
        self.snapshot().bounds
    }

    fn show_preview(
        &mut self,
        _frame: &VideoFrame,
        rect: Rect,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| {
            s.preview_frames += 1;
            s.preview_rect = Some(rect);
        });
        Ok(())
    }

    fn show_capture(
        &mut self,
        image: Option<&CapturedImage>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.capture = image.cloned());
        Ok(())
    }

    fn show_label(&mut self, text: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.label = text.map(str::to_string));
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| {
            if s.status != text {
                s.status = text.to_string();
                s.status_history.push(text.to_string());
            }
        });
        Ok(())
    }

    fn set_capture_enabled(&mut self, enabled: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.capture_enabled = enabled);
        Ok(())
    }
}
