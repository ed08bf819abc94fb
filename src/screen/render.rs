use crate::device_display::interface::DeviceDisplay;
use crate::screen::core::Model;
use std::sync::{Arc, Mutex, PoisonError};

/// Pushes presenter state to the display. The preview layer is not touched;
/// the preview loop draws it directly.
#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let presenter = &model.presenter;
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        device_display.show_capture(presenter.image())?;
        device_display.show_label(presenter.label())?;
        device_display.show_status(&presenter.status_line())?;
        device_display.set_capture_enabled(presenter.capture_enabled() && !model.exiting)?;

        Ok(())
    }
}
