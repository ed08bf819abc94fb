use crate::device_camera::interface::{DeviceCamera, StillEncoding};
use crate::error::CaptureError;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub id: u64,
    pub encoding: StillEncoding,
}

/// Encoded still photo. Cloning shares the bytes.
#[derive(Clone, PartialEq)]
pub struct CapturedImage {
    pub request_id: u64,
    pub encoding: StillEncoding,
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("request_id", &self.request_id)
            .field("encoding", &self.encoding)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Pending(CaptureRequest),
}

/// `Idle --begin--> Pending --complete--> Idle`.
///
/// Owned by the UI context. A request made while another one is pending is
/// rejected rather than queued, the hardware serialises captures anyway.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StillCaptureController {
    state: CaptureState,
    last_id: u64,
}

impl StillCaptureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CaptureState::Pending(_))
    }

    pub fn begin(&mut self, encoding: StillEncoding) -> Result<CaptureRequest, CaptureError> {
        if self.is_pending() {
            return Err(CaptureError::Busy);
        }

        self.last_id += 1;
        let request = CaptureRequest {
            id: self.last_id,
            encoding,
        };
        self.state = CaptureState::Pending(request);
        Ok(request)
    }

    /// Delivers the hardware result of `request_id`. Returns `None` for a
    /// request that is no longer pending (cancelled or unknown).
    pub fn complete(
        &mut self,
        request_id: u64,
        result: Result<CapturedImage, CaptureError>,
    ) -> Option<Result<CapturedImage, CaptureError>> {
        match self.state {
            CaptureState::Pending(request) if request.id == request_id => {
                self.state = CaptureState::Idle;
                Some(result)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<CaptureRequest> {
        match std::mem::take(&mut self.state) {
            CaptureState::Pending(request) => Some(request),
            CaptureState::Idle => None,
        }
    }
}

/// Performs the hardware capture for `request`. Runs on a worker context.
pub fn execute(camera: &dyn DeviceCamera, request: CaptureRequest) -> Result<CapturedImage, CaptureError> {
    let still = camera
        .capture_still(request.encoding)
        .map_err(|e| CaptureError::HardwareFailure(e.to_string()))?;

    Ok(CapturedImage {
        request_id: request.id,
        encoding: request.encoding,
        width: still.width,
        height: still.height,
        bytes: Arc::from(still.bytes),
    })
}
