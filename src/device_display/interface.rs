use crate::device_camera::interface::VideoFrame;
use crate::preview::fit::{Rect, Size};
use crate::still_capture::controller::CapturedImage;
use std::error::Error;

/// The surface the screen draws on: a live preview layer plus the
/// presenter's captured image, label and status line.
pub trait DeviceDisplay: Send + Sync {
    /// Current bounds of the preview layer.
    fn bounds(&self) -> Size;

    /// Draw one preview frame inside `rect` (already fitted to `bounds`).
    fn show_preview(&mut self, frame: &VideoFrame, rect: Rect)
        -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_capture(
        &mut self,
        image: Option<&CapturedImage>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_label(&mut self, text: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_status(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Enables or disables the take-photo control.
    fn set_capture_enabled(&mut self, enabled: bool) -> Result<(), Box<dyn Error + Send + Sync>>;
}
