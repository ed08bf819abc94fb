use crate::capture_session::session::{SessionOutput, SessionPreset};
use crate::device_camera::interface::{
    CameraDevice, CameraPosition, DeviceCamera, EncodedStill, StillEncoding, VideoFrame,
};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::Rng;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DeviceCameraFakeConfig {
    pub has_back_camera: bool,
    pub open_error: Option<String>,
    pub start_error: Option<String>,
    pub capture_error: Option<String>,
    pub preview_width: u32,
    pub preview_height: u32,
    pub still_width: u32,
    pub still_height: u32,
    pub start_delay: Duration,
    pub capture_delay: Duration,
}

impl Default for DeviceCameraFakeConfig {
    fn default() -> Self {
        Self {
            has_back_camera: true,
            open_error: None,
            start_error: None,
            capture_error: None,
            preview_width: 320,
            preview_height: 240,
            still_width: 640,
            still_height: 480,
            start_delay: Duration::from_millis(500),
            capture_delay: Duration::from_millis(300),
        }
    }
}

impl DeviceCameraFakeConfig {
    /// Same sensor without the artificial hardware latency.
    pub fn instant() -> Self {
        Self {
            start_delay: Duration::ZERO,
            capture_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Synthetic back camera producing a drifting colour gradient with sensor noise.
pub struct DeviceCameraFake {
    config: DeviceCameraFakeConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    opened: Mutex<Option<CameraDevice>>,
    running: AtomicBool,
    frame_index: AtomicU64,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
    capture_count: AtomicUsize,
}

impl DeviceCameraFake {
    pub fn new(config: DeviceCameraFakeConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("fake"),
            opened: Mutex::new(None),
            running: AtomicBool::new(false),
            frame_index: AtomicU64::new(0),
            start_count: AtomicUsize::new(0),
            stop_count: AtomicUsize::new(0),
            capture_count: AtomicUsize::new(0),
        }
    }

    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn render(&self, width: u32, height: u32) -> RgbImage {
        let t = self.frame_index.fetch_add(1, Ordering::SeqCst) as u32;
        let mut rng = rand::rng();

        RgbImage::from_fn(width, height, |x, y| {
            let noise: u8 = rng.random_range(0..12);
            Rgb([
                ((x * 255 / width.max(1) + t) % 256) as u8,
                ((y * 255 / height.max(1) + t / 2) % 256) as u8,
                128u8.saturating_add(noise),
            ])
        })
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn default_device(&self, position: CameraPosition) -> Option<CameraDevice> {
        match position {
            CameraPosition::Back if self.config.has_back_camera => Some(CameraDevice {
                id: "fake:0".to_string(),
                name: "Fake Back Camera".to_string(),
                position: CameraPosition::Back,
            }),
            _ => None,
        }
    }

    fn open(&self, device: &CameraDevice) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(reason) = &self.config.open_error {
            return Err(reason.clone().into());
        }
        self.logger.info(&format!("Opened {}", device.name))?;
        *self.opened.lock().unwrap_or_else(PoisonError::into_inner) = Some(device.clone());
        Ok(())
    }

    fn supports(&self, preset: SessionPreset, output: &SessionOutput) -> bool {
        match output {
            SessionOutput::Preview => true,
            SessionOutput::StillPhoto {
                encoding: StillEncoding::Jpeg,
            } => preset != SessionPreset::Low,
            SessionOutput::StillPhoto {
                encoding: StillEncoding::Png,
            } => matches!(preset, SessionPreset::High | SessionPreset::Photo),
        }
    }

    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self
            .opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
        {
            return Err("camera has not been opened".into());
        }
        self.logger.info("Starting camera...")?;
        self.start_count.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.config.start_delay);
        if let Some(reason) = &self.config.start_error {
            return Err(reason.clone().into());
        }
        self.running.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Stopping camera...")?;
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn next_frame(&self) -> Result<VideoFrame, Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_running() {
            return Err("camera is not running".into());
        }
        let image = self.render(self.config.preview_width, self.config.preview_height);
        Ok(VideoFrame {
            width: image.width(),
            height: image.height(),
            rgb: Arc::from(image.into_raw()),
        })
    }

    fn capture_still(
        &self,
        encoding: StillEncoding,
    ) -> Result<EncodedStill, Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_running() {
            return Err("camera is not running".into());
        }
        self.logger.info("Capturing still...")?;
        self.capture_count.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.config.capture_delay);
        if let Some(reason) = &self.config.capture_error {
            return Err(reason.clone().into());
        }

        let image = self.render(self.config.still_width, self.config.still_height);
        let (width, height) = image.dimensions();
        let format = match encoding {
            StillEncoding::Jpeg => ImageFormat::Jpeg,
            StillEncoding::Png => ImageFormat::Png,
        };

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), format)?;

        self.logger
            .info(&format!("Still captured ({} bytes)", bytes.len()))?;

        Ok(EncodedStill {
            bytes,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceCameraFake, DeviceCameraFakeConfig};
    use crate::device_camera::interface::{CameraPosition, DeviceCamera, StillEncoding};
    use crate::library::logger::impl_fake::LoggerFake;
    use std::sync::Arc;

    fn started_camera() -> DeviceCameraFake {
        let camera = DeviceCameraFake::new(
            DeviceCameraFakeConfig::instant(),
            Arc::new(LoggerFake::new()),
        );
        let device = camera.default_device(CameraPosition::Back).unwrap();
        camera.open(&device).unwrap();
        camera.start().unwrap();
        camera
    }

    #[test]
    fn test_still_is_a_decodable_jpeg() {
        let camera = started_camera();

        let still = camera.capture_still(StillEncoding::Jpeg).unwrap();
        let decoded = image::load_from_memory(&still.bytes).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (640, 480));
        assert_eq!((still.width, still.height), (640, 480));
        assert_eq!(camera.capture_count(), 1);
    }

    #[test]
    fn test_preview_frames_are_rgb() {
        let camera = started_camera();

        let frame = camera.next_frame().unwrap();

        assert_eq!(frame.rgb.len(), (frame.width * frame.height * 3) as usize);
    }

    #[test]
    fn test_capture_requires_running_camera() {
        let camera = started_camera();
        camera.stop().unwrap();

        assert!(camera.capture_still(StillEncoding::Jpeg).is_err());
        assert!(camera.next_frame().is_err());
    }

    #[test]
    fn test_no_front_camera() {
        let camera = started_camera();

        assert!(camera.default_device(CameraPosition::Front).is_none());
    }
}
