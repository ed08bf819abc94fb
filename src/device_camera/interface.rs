use crate::capture_session::session::{SessionOutput, SessionPreset};
use crate::preview::fit::Size;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPosition {
    Back,
    Front,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub position: CameraPosition,
}

/// Codec used for still photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StillEncoding {
    #[default]
    Jpeg,
    Png,
}

/// A raw RGB8 preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Arc<[u8]>,
}

impl VideoFrame {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedStill {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub trait DeviceCamera: Send + Sync {
    fn default_device(&self, position: CameraPosition) -> Option<CameraDevice>;

    fn open(&self, device: &CameraDevice) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn supports(&self, preset: SessionPreset, output: &SessionOutput) -> bool;

    /// Blocks until the hardware is streaming.
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Latest frame of the live stream. Frames produced between two calls are dropped.
    fn next_frame(&self) -> Result<VideoFrame, Box<dyn std::error::Error + Send + Sync>>;

    fn capture_still(
        &self,
        encoding: StillEncoding,
    ) -> Result<EncodedStill, Box<dyn std::error::Error + Send + Sync>>;
}
