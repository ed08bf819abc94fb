use crate::device_camera::interface::VideoFrame;
use crate::device_display::interface::DeviceDisplay;
use crate::preview::fit::{Rect, Size};
use crate::still_capture::controller::CapturedImage;
use std::error::Error;

/// Text rendition of the screen. Only prints what changed.
pub struct DeviceDisplayConsole {
    bounds: Size,
    preview_rect: Option<Rect>,
    preview_frames: u64,
    capture: Option<u64>,
    label: Option<String>,
    status: String,
    capture_enabled: Option<bool>,
}

impl DeviceDisplayConsole {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            preview_rect: None,
            preview_frames: 0,
            capture: None,
            label: None,
            status: String::new(),
            capture_enabled: None,
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn show_preview(
        &mut self,
        frame: &VideoFrame,
        rect: Rect,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.preview_frames += 1;
        if self.preview_rect != Some(rect) {
            self.preview_rect = Some(rect);
            println!(
                "│ preview {}x{} -> {:.0}x{:.0} at ({:.0}, {:.0})",
                frame.width, frame.height, rect.width, rect.height, rect.x, rect.y
            );
        }
        Ok(())
    }

    fn show_capture(
        &mut self,
        image: Option<&CapturedImage>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let id = image.map(|image| image.request_id);
        if id == self.capture {
            return Ok(());
        }
        self.capture = id;
        match image {
            Some(image) => println!(
                "│ photo #{}: {}x{} {:?}, {} bytes",
                image.request_id,
                image.width,
                image.height,
                image.encoding,
                image.bytes.len()
            ),
            None => println!("│ photo: none"),
        }
        Ok(())
    }

    fn show_label(&mut self, text: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.label.as_deref() == text {
            return Ok(());
        }
        self.label = text.map(str::to_string);
        println!("│ label: {}", text.unwrap_or("-"));
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.status == text {
            return Ok(());
        }
        self.status = text.to_string();
        println!("┌ {} (preview frames: {})", text, self.preview_frames);
        Ok(())
    }

    fn set_capture_enabled(&mut self, enabled: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.capture_enabled == Some(enabled) {
            return Ok(());
        }
        self.capture_enabled = Some(enabled);
        println!(
            "│ take photo: {}",
            if enabled { "[enter]" } else { "disabled" }
        );
        Ok(())
    }
}
